use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

// One advisory lock per pack directory. Entries are never removed; the table
// only grows with the number of distinct packs touched by this process.
static PACK_LOCKS: Mutex<BTreeMap<Utf8PathBuf, Arc<Mutex<()>>>> = Mutex::new(BTreeMap::new());

/// Held for the duration of a manifest read-modify-write on one pack.
pub struct PackGuard {
    _guard: parking_lot::ArcMutexGuard<parking_lot::RawMutex, ()>,
}

pub fn lock_pack(pack_dir: &Utf8Path) -> PackGuard {
    let key = canonical_key(pack_dir);
    let lock = {
        let mut table = PACK_LOCKS.lock();
        table.entry(key).or_default().clone()
    };
    PackGuard {
        _guard: lock.lock_arc(),
    }
}

// Canonical when the directory exists so different spellings share a lock.
fn canonical_key(pack_dir: &Utf8Path) -> Utf8PathBuf {
    pack_dir
        .canonicalize_utf8()
        .unwrap_or_else(|_| pack_dir.to_path_buf())
}
