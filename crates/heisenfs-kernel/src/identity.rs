//! Caller identity for newly created files.
//!
//! The engine is the only place that asks who is calling. A bridge that knows
//! the requesting process (FUSE passes it per request) can supply its own
//! [`IdentitySource`]; otherwise [`ProcessIdentity`] reports the mounting
//! process itself.

/// Owner and group of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller {
    pub uid: u32,
    pub gid: u32,
}

impl Caller {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }
}

/// Supplies the identity that owns newly created files.
pub trait IdentitySource: Send + Sync {
    /// The identity of the current caller.
    fn caller(&self) -> Caller;
}

/// The identity of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdentity;

impl IdentitySource for ProcessIdentity {
    #[cfg(unix)]
    fn caller(&self) -> Caller {
        Caller {
            uid: rustix::process::getuid().as_raw(),
            gid: rustix::process::getgid().as_raw(),
        }
    }

    #[cfg(not(unix))]
    fn caller(&self) -> Caller {
        Caller::new(0, 0)
    }
}

/// A constant identity.
#[derive(Debug, Clone, Copy)]
pub struct FixedIdentity(pub Caller);

impl FixedIdentity {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self(Caller::new(uid, gid))
    }
}

impl IdentitySource for FixedIdentity {
    fn caller(&self) -> Caller {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_identity() {
        let id = FixedIdentity::new(1000, 100);
        assert_eq!(id.caller(), Caller::new(1000, 100));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_identity_matches_std() {
        use std::os::unix::fs::MetadataExt;

        // A file we just created is owned by our effective uid, which equals
        // the real uid outside of setuid contexts.
        let file = tempfile::NamedTempFile::new().unwrap();
        let meta = file.as_file().metadata().unwrap();
        assert_eq!(ProcessIdentity.caller().uid, meta.uid());
    }
}
