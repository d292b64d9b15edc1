use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlyoverError {
    #[error("flight line needs at least {needed} waypoints, got {got}")]
    PathTooShort { needed: usize, got: usize },

    #[error("flight line elevation profile contains no valid samples")]
    EmptyProfile,
}

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("flyover path has no waypoints")]
    EmptyPath,

    #[error("scene host returned no object for {0}")]
    HostObject(&'static str),
}
