use crate::panel::region::RegionId;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    #[error("panel region `{0}` not found")]
    MissingRegion(RegionId),

    #[error("chart sample {index} out of range (profile has {len} samples)")]
    SampleOutOfRange { index: usize, len: usize },
}
