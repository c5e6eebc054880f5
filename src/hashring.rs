//! Consistent hash ring used to assign keys to peers.
//!
//! Each peer is placed at `replicas` virtual positions on a 32-bit ring, hashed from
//! `format!("{i}{peer}")` for `i` in `0..replicas`. Looking up a key hashes it the same way and
//! walks clockwise (ascending hash value) to the first virtual node, wrapping back to the first
//! node on the ring if the key's hash is greater than every virtual node's hash.
//!
//! The default hash function is CRC32 (IEEE polynomial, via [`crc32fast`]), bit-for-bit
//! compatible with Go's `hash/crc32.ChecksumIEEE` — the function the original GeeCache ring used
//! — so a ring built from the same peer list places keys identically.

use std::collections::BTreeMap;

/// A function mapping a byte slice to a 32-bit hash. Swappable so tests can use a predictable
/// hash (e.g. parsing the input as a decimal integer) instead of CRC32.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

fn crc32_ieee(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// A consistent-hash ring mapping keys to peer identifiers.
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    ring: BTreeMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring with the given virtual-node replica count and hash function.
    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        HashRing {
            hash,
            replicas,
            ring: BTreeMap::new(),
        }
    }

    /// Creates an empty ring with the given replica count, using CRC32-IEEE as the hash
    /// function.
    pub fn new(replicas: usize) -> Self {
        HashRing::with_hash(replicas, Box::new(crc32_ieee))
    }

    /// Adds peers to the ring, placing `replicas` virtual nodes for each.
    pub fn add(&mut self, peers: &[impl AsRef<str>]) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{i}{peer}").as_bytes());
                self.ring.insert(hash, peer.to_string());
            }
        }
    }

    /// Returns the peer owning `key`, or `None` if the ring has no peers.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        self.ring
            .range(hash..)
            .next()
            .or_else(|| self.ring.iter().next())
            .map(|(_, peer)| peer.as_str())
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("peers", &self.ring.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal_hash() -> HashFn {
        Box::new(|data: &[u8]| {
            std::str::from_utf8(data)
                .expect("test keys are ascii decimal digits")
                .parse::<u32>()
                .expect("test keys are ascii decimal digits")
        })
    }

    #[test]
    fn s4_ring_wraps_to_the_first_node() {
        // replicas=3, peers "6","4","2" -> virtual hashes {02,12,22,04,14,24,06,16,26}.
        let mut ring = HashRing::with_hash(3, decimal_hash());
        ring.add(&["6", "4", "2"]);
        assert_eq!(ring.get("2"), Some("2"));
        assert_eq!(ring.get("11"), Some("2"));
        assert_eq!(ring.get("23"), Some("4"));
        assert_eq!(ring.get("27"), Some("2")); // wraps past the highest virtual node (26)
    }

    #[test]
    fn empty_ring_returns_none() {
        let ring = HashRing::new(3);
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn default_hash_is_deterministic_crc32() {
        let mut a = HashRing::new(5);
        let mut b = HashRing::new(5);
        a.add(&["peer-a", "peer-b", "peer-c"]);
        b.add(&["peer-a", "peer-b", "peer-c"]);
        for key in ["k1", "k2", "hello", "world"] {
            assert_eq!(a.get(key), b.get(key));
        }
    }
}
