//! Iconographic summary: the four labelled facts shown under the title.

use serde::Serialize;

use crate::model::Trail;

pub const ASCENT_ICON: &str = "fa fa-line-chart";
pub const DIFFICULTY_ICON: &str = "fa fa-wrench";
pub const WALKTIME_ICON: &str = "fa fa-clock-o";

/// One icon + text pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfographFact {
    pub icon: &'static str,
    pub text: String,
}

impl InfographFact {
    fn new(icon: &'static str, text: impl Into<String>) -> Self {
        Self {
            icon,
            text: text.into(),
        }
    }
}

/// Ascent, difficulty, walktime and status, always in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Infograph {
    pub facts: [InfographFact; 4],
}

/// Build the summary for a trail.
pub fn infograph(trail: &Trail) -> Infograph {
    Infograph {
        facts: [
            InfographFact::new(ASCENT_ICON, format!("{} m", trail.ascent)),
            InfographFact::new(DIFFICULTY_ICON, trail.difficulty.as_str()),
            InfographFact::new(WALKTIME_ICON, format!("{} hr", trail.walktime)),
            InfographFact::new(trail.status.icon(), trail.status.label()),
        ],
    }
}

impl Infograph {
    pub fn ascent(&self) -> &InfographFact {
        &self.facts[0]
    }

    pub fn difficulty(&self) -> &InfographFact {
        &self.facts[1]
    }

    pub fn walktime(&self) -> &InfographFact {
        &self.facts[2]
    }

    pub fn status(&self) -> &InfographFact {
        &self.facts[3]
    }

    /// HTML fragment: one `span.infograph` per fact.
    pub fn markup(&self) -> String {
        self.facts
            .iter()
            .map(|fact| {
                format!(
                    "<span class='infograph'><span class='{}' aria-hidden='true'></span> {}</span>",
                    html_escape::encode_single_quoted_attribute(fact.icon),
                    html_escape::encode_text(&fact.text)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
