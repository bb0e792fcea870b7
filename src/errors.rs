use std::collections::TryReserveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The handle does not refer to a live object of the requested type.
    InvalidHandle,
    /// Backing storage could not be grown, or a configured element/bucket limit was hit.
    AllocationFailed,
    /// The registry is tracking as many objects as it is allowed to.
    CapacityExhausted,
    DuplicateKey,
    /// The per-thread default registry is already borrowed further up the stack.
    RegistryBusy,
}

impl From<TryReserveError> for ContainerError {
    fn from(_error: TryReserveError) -> Self {
        ContainerError::AllocationFailed
    }
}

impl From<ContainerError> for String {
    fn from(error: ContainerError) -> Self {
        error.to_string()
    }
}

impl std::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerError::InvalidHandle => write!(f, "Invalid or stale handle"),
            ContainerError::AllocationFailed => write!(f, "Allocation failed"),
            ContainerError::CapacityExhausted => write!(f, "Registry tracking capacity exhausted"),
            ContainerError::DuplicateKey => write!(f, "Key already present"),
            ContainerError::RegistryBusy => write!(f, "Default registry is already in use"),
        }
    }
}

// Also provides `From<ContainerError> for anyhow::Error` through anyhow's blanket impl.
impl std::error::Error for ContainerError {}
