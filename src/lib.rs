//! bucket-hashmap: a single-threaded, separately-chained hash map with
//! load-factor driven rebuilds, plus a string `Dictionary` with stricter
//! erase semantics.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table whose storage layout, resize policy and iteration
//!   order are explicit and observable, not hidden behind an opaque
//!   open-addressing scheme.
//! - Layers:
//!   - Bucket<K, V>: an owned, insertion-ordered `Vec` of entries that
//!     share one masked hash index.
//!   - BucketHashMap<K, V, S>: owns exactly `capacity` buckets, routes
//!     every key with `hash & (capacity - 1)`, and rebuilds its storage
//!     when the load factor leaves the bounds of its `ResizePolicy`.
//!   - Dictionary: `BucketHashMap<String, String>` that turns a failed
//!     `erase` into `Error::InvalidKey` and adds an additive `update`.
//!
//! Constraints
//! - Capacity is a power of two and never drops below the policy floor
//!   (`START_CAPACITY = 16` by default).
//! - At most one entry per key; duplicate inserts return `false` and do
//!   not touch the map.
//! - After every insert or erase that changed the size, the load factor
//!   is back inside `[0.25, 0.75]`, except at the floor capacity where the
//!   lower bound is waived. `clear` keeps capacity and skips the check.
//!
//! Resizing
//! - The policy yields one doubling or halving step at a time. The map
//!   keeps applying steps until the policy is satisfied, so a bulk load
//!   from parallel sequences reaches the same capacity as inserting the
//!   pairs one by one would.
//! - Each step is a full rebuild: entries are moved out in iteration
//!   order into freshly allocated buckets.
//! - Each entry stores its precomputed `u64` hash; rebuilds reuse it and
//!   never call `K: Hash` again.
//!
//! Iteration
//! - Buckets are visited in array order, entries within a bucket in
//!   append order. Order across a rebuild is not preserved.
//! - Borrowing iterators (`iter`, `iter_mut`, `keys`, ...) are tied to
//!   the map's lifetime, so the borrow checker rules out mutation while
//!   they are alive.
//! - `Cursor` is the detached form: `begin()`, `end()`, `advance`,
//!   `entry_at`. `end()` is the position reached after advancing `len()`
//!   times from `begin()`. Any structural change invalidates cursors;
//!   debug builds catch a stale cursor via `DebugStamp`, release builds do
//!   not check.
//!
//! Equality
//! - Two maps are equal when they hold the same key/value pairs; capacity
//!   and bucket layout do not take part.
//!
//! Notes and non-goals
//! - No ordering among keys, no thread-safety, no persistence.
//! - Indexing a missing key panics; `get_or_first` keeps the lenient
//!   "first entry" fallback for callers that need it.
//! - Rebuilds are logged through the `log` facade at `debug` level; the
//!   crate never installs a logger.

mod bucket;
pub mod bucket_hash_map;
mod bucket_hash_map_proptest;
pub mod dictionary;
pub mod error;
pub mod iter;
pub mod policy;
mod stamp;

// Public surface
pub use bucket_hash_map::BucketHashMap;
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use iter::Cursor;
pub use policy::{ResizePolicy, LOWER_LOAD_FACTOR, START_CAPACITY, UPPER_LOAD_FACTOR};
