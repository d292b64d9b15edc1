use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("invalid builder parameter '{0}'")]
    Builder(&'static str),

    #[error("elevation grid contains no valid samples")]
    NoValidElevationData,
}
