/// Index of a node amongst its node list. The index is used to evaluate the
/// share of a node and is thereafter fixed: the same index designates the
/// node in any later round, for example when producing partial signatures.
pub type Index = u32;

/// Canonical bundle digest (SHA-256).
pub type Hash32 = [u8; 32];
