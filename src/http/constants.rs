//! Constants for the HTTP layer (timeouts, buffer sizes).

/// HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Write buffer size used when streaming an artifact to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Block size used when hashing a local file for deploy checksums.
pub const CHECKSUM_BLOCK_SIZE: usize = 65536;

/// Path prefix every REST route lives under.
pub const ARTIFACTORY_PREFIX: &str = "artifactory";
