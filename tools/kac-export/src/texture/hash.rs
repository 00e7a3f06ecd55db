//! Texture identity hashing
//!
//! A texture's identity is the first 128 bits of the SHA-256 of its level-0
//! pixels (little-endian 5551 words). It is a fingerprint for tooling and
//! debugging only; textures with equal hashes are still stored separately.

use kac_common::{MipLevel, PIXEL_HASH_SIZE};
use sha2::{Digest, Sha256};

/// Truncated SHA-256 of a mip level's packed pixel bytes
pub fn pixel_hash(level: &MipLevel) -> [u8; PIXEL_HASH_SIZE] {
    let digest = Sha256::digest(level.to_le_bytes());

    let mut hash = [0u8; PIXEL_HASH_SIZE];
    hash.copy_from_slice(&digest[..PIXEL_HASH_SIZE]);
    hash
}
