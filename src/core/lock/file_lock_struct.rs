// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// From this library
use crate::core::errors::FileLockError;
use crate::core::lock::LockMode;

/// Maximum time spent waiting for a hard-link lock before giving up with
/// [`FileLockError::StaleLock`].
const MAX_WAIT: Duration = Duration::from_secs(30);

/// Time slept between failed hard-link attempts.
const RETRY_INTERVAL: Duration = Duration::from_micros(5000);

/// When set to `simple`, overrides the default hard-link locking scheme with a plain
/// `flock(2)` on a dedicated `<file>.lock`.
const ENV_LOCK_MODE: &str = "MNTTAB_LOCK_MODE";

/// A lock on a mount table file (e.g. `/etc/mtab`), compatible with the traditional hard-link
/// locking scheme other tools touching the same file also speak.
///
/// An application must always call [`unlock`](FileLock::unlock) (or let `FileLock` drop) before
/// exiting, or a stale lock file is left behind for the next caller to time out against.
pub struct FileLock {
    lockfile: PathBuf,
    linkfile: PathBuf,
    fd: Option<RawFd>,
    locked: bool,
    mode: LockMode,
    sigblock: bool,
    old_mask: libc::sigset_t,
}

impl std::fmt::Debug for FileLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLock")
            .field("lockfile", &self.lockfile)
            .field("linkfile", &self.linkfile)
            .field("locked", &self.locked)
            .field("mode", &self.mode)
            .field("sigblock", &self.sigblock)
            .finish()
    }
}

impl FileLock {
    /// Creates a lock handler covering `datafile`. No filesystem state changes until
    /// [`lock`](FileLock::lock) is called.
    pub fn new<T: AsRef<Path>>(datafile: T) -> Result<FileLock, FileLockError> {
        let datafile = datafile.as_ref();
        log::debug!("FileLock::new creating a new `FileLock` for file {:?}", datafile);

        let pid = std::process::id();
        let mut lockfile = datafile.as_os_str().to_owned();
        lockfile.push("~");
        let mut linkfile = datafile.as_os_str().to_owned();
        linkfile.push(format!("~.{pid}"));

        let mut lock = FileLock {
            lockfile: PathBuf::from(lockfile),
            linkfile: PathBuf::from(linkfile),
            fd: None,
            locked: false,
            mode: LockMode::HardLink,
            sigblock: false,
            old_mask: empty_sigset(),
        };

        if std::env::var(ENV_LOCK_MODE).as_deref() == Ok("simple") {
            lock.set_mode(LockMode::Simple);
        }

        Ok(lock)
    }

    /// Switches between [`LockMode::HardLink`] (the default) and [`LockMode::Simple`], renaming
    /// the lock file to match (`<file>~` vs `<file>.lock`). Has no effect once already locked.
    pub fn set_mode(&mut self, mode: LockMode) {
        if self.locked || self.mode == mode {
            return;
        }

        log::debug!("FileLock::set_mode switching to {:?}", mode);

        self.lockfile = match mode {
            LockMode::Simple => {
                let mut path = self.lockfile.clone().into_os_string();
                if let Some(base) = path.to_str().and_then(|s| s.strip_suffix('~')) {
                    path = format!("{base}.lock").into();
                }
                PathBuf::from(path)
            }
            LockMode::HardLink => {
                let mut path = self.lockfile.clone().into_os_string();
                if let Some(base) = path.to_str().and_then(|s| s.strip_suffix(".lock")) {
                    path = format!("{base}~").into();
                }
                PathBuf::from(path)
            }
        };
        self.mode = mode;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether signals are blocked for the duration of [`lock`](FileLock::lock). Off by default.
    pub fn block_signals(&mut self, enable: bool) {
        log::debug!(
            "FileLock::block_signals {}",
            if enable { "enabling" } else { "disabling" }
        );
        self.sigblock = enable;
    }

    /// Acquires the lock, blocking until it is free or [`MAX_WAIT`] elapses.
    pub fn lock(&mut self) -> Result<(), FileLockError> {
        if self.locked {
            return Ok(());
        }

        log::debug!("FileLock::lock locking {:?}", self.lockfile);

        match self.mode {
            LockMode::Simple => self.lock_simple(),
            LockMode::HardLink => self.lock_hardlink(),
        }
    }

    /// Releases the lock. Safe to call even if locking never succeeded.
    pub fn unlock(&mut self) {
        log::debug!("FileLock::unlock releasing {:?}", self.lockfile);

        match self.mode {
            LockMode::Simple => self.unlock_simple(),
            LockMode::HardLink => self.unlock_hardlink(),
        }

        self.locked = false;
        if self.sigblock {
            unsafe {
                libc::sigprocmask(libc::SIG_SETMASK, &self.old_mask, std::ptr::null_mut());
            }
        }
    }

    fn lock_simple(&mut self) -> Result<(), FileLockError> {
        if self.sigblock {
            self.old_mask = block_all_signals();
        }

        let c_path = path_to_cstring(&self.lockfile)?;
        let fd = unsafe {
            libc::open(
                c_path.as_ptr(),
                libc::O_RDONLY | libc::O_CREAT | libc::O_CLOEXEC,
                0o644,
            )
        };
        if fd < 0 {
            return Err(self.fail(std::io::Error::last_os_error().into()));
        }

        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::fstat(fd, &mut st) } < 0 {
            unsafe { libc::close(fd) };
            return Err(self.fail(std::io::Error::last_os_error().into()));
        }

        let lock_mask = libc::S_IRUSR | libc::S_IWUSR | libc::S_IRGRP | libc::S_IROTH;
        if st.st_mode & lock_mask != lock_mask && unsafe { libc::fchmod(fd, lock_mask) } < 0 {
            unsafe { libc::close(fd) };
            return Err(self.fail(std::io::Error::last_os_error().into()));
        }

        loop {
            let rc = unsafe { libc::flock(fd, libc::LOCK_EX) };
            if rc == 0 {
                break;
            }
            let err = std::io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EAGAIN) | Some(libc::EINTR) => continue,
                _ => {
                    unsafe { libc::close(fd) };
                    return Err(self.fail(err.into()));
                }
            }
        }

        self.fd = Some(fd);
        self.locked = true;
        Ok(())
    }

    fn unlock_simple(&mut self) {
        if let Some(fd) = self.fd.take() {
            unsafe { libc::close(fd) };
        }
    }

    fn lock_hardlink(&mut self) -> Result<(), FileLockError> {
        if self.sigblock {
            self.old_mask = block_all_signals_except_alarm();
        }

        let link_cstr = path_to_cstring(&self.linkfile)?;
        let lock_cstr = path_to_cstring(&self.lockfile)?;

        let i = unsafe {
            libc::open(
                link_cstr.as_ptr(),
                libc::O_WRONLY | libc::O_CREAT | libc::O_CLOEXEC,
                0o600,
            )
        };
        if i < 0 {
            return Err(self.fail(std::io::Error::last_os_error().into()));
        }
        unsafe { libc::close(i) };

        let deadline = Instant::now() + MAX_WAIT;

        loop {
            let linked = unsafe { libc::link(link_cstr.as_ptr(), lock_cstr.as_ptr()) } == 0;
            if !linked {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::EEXIST) {
                    return Err(self.fail(err.into()));
                }
            }
            self.locked = linked;

            let fd = unsafe { libc::open(lock_cstr.as_ptr(), libc::O_WRONLY | libc::O_CLOEXEC) };
            if fd < 0 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::ENOENT) && Instant::now() < deadline {
                    self.locked = false;
                    continue;
                }
                return Err(self.fail(err.into()));
            }

            let mut fl: libc::flock = unsafe { std::mem::zeroed() };
            fl.l_type = libc::F_WRLCK as libc::c_short;
            fl.l_whence = libc::SEEK_SET as libc::c_short;

            if self.locked {
                // Best-effort: it was us who created the link, so we proceed regardless.
                unsafe { libc::fcntl(fd, libc::F_SETLK, &fl) };
                self.fd = Some(fd);
                break;
            }

            match wait_for_lock(fd, &mut fl, deadline) {
                Ok(()) => {}
                Err(WaitOutcome::TimedOut) => {
                    unsafe { libc::close(fd) };
                    self.unlock_hardlink();
                    return Err(FileLockError::StaleLock(self.lockfile.clone()));
                }
                Err(WaitOutcome::Io(err)) => {
                    unsafe { libc::close(fd) };
                    return Err(self.fail(err.into()));
                }
            }

            std::thread::sleep(RETRY_INTERVAL);
            unsafe { libc::close(fd) };
        }

        unsafe { libc::unlink(link_cstr.as_ptr()) };
        Ok(())
    }

    fn unlock_hardlink(&mut self) {
        if !self.locked {
            // We might own the lock without knowing it, if a signal interrupted us between
            // link() succeeding and the flag being set. We own it iff link and lock point at
            // the same inode.
            use std::os::unix::fs::MetadataExt;
            if let (Ok(lo), Ok(li)) =
                (std::fs::metadata(&self.lockfile), std::fs::metadata(&self.linkfile))
            {
                if lo.dev() == li.dev() && lo.ino() == li.ino() {
                    self.locked = true;
                }
            }
        }

        let _ = std::fs::remove_file(&self.linkfile);
        if let Some(fd) = self.fd.take() {
            unsafe { libc::close(fd) };
        }
        if self.locked {
            let _ = std::fs::remove_file(&self.lockfile);
        }
    }

    fn fail(&mut self, err: FileLockError) -> FileLockError {
        self.unlock();
        err
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        log::debug!("FileLock::drop releasing {:?}", self.lockfile);
        self.unlock();
    }
}

enum WaitOutcome {
    TimedOut,
    Io(std::io::Error),
}

extern "C" fn noop_signal_handler(_sig: libc::c_int) {}

/// Waits for `F_SETLKW`, racing it against `SIGALRM` so a process that never releases the lock
/// cannot block us forever.
fn wait_for_lock(fd: RawFd, fl: &mut libc::flock, deadline: Instant) -> Result<(), WaitOutcome> {
    let now = Instant::now();
    if now >= deadline {
        return Err(WaitOutcome::TimedOut);
    }
    let remaining = (deadline - now).as_secs().max(1) as libc::c_uint;

    let mut sa: libc::sigaction = unsafe { std::mem::zeroed() };
    sa.sa_sigaction = noop_signal_handler as usize;
    unsafe { libc::sigfillset(&mut sa.sa_mask) };

    let mut old_sa: libc::sigaction = unsafe { std::mem::zeroed() };
    unsafe { libc::sigaction(libc::SIGALRM, &sa, &mut old_sa) };

    unsafe { libc::alarm(remaining) };
    let rc = unsafe { libc::fcntl(fd, libc::F_SETLKW, fl as *mut libc::flock) };
    unsafe { libc::alarm(0) };
    unsafe { libc::sigaction(libc::SIGALRM, &old_sa, std::ptr::null_mut()) };

    if rc == -1 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            return Err(WaitOutcome::TimedOut);
        }
        return Err(WaitOutcome::Io(err));
    }

    Ok(())
}

fn block_all_signals() -> libc::sigset_t {
    unsafe {
        let mut old_mask = empty_sigset();
        let mut sigs = empty_sigset();
        libc::sigfillset(&mut sigs);
        libc::sigprocmask(libc::SIG_BLOCK, &sigs, &mut old_mask);
        old_mask
    }
}

/// Blocks every signal except `SIGTRAP` and `SIGALRM`, leaving `SIGALRM` free to interrupt
/// [`wait_for_lock`].
fn block_all_signals_except_alarm() -> libc::sigset_t {
    unsafe {
        let mut old_mask = empty_sigset();
        let mut sigs = empty_sigset();
        libc::sigfillset(&mut sigs);
        libc::sigdelset(&mut sigs, libc::SIGTRAP);
        libc::sigdelset(&mut sigs, libc::SIGALRM);
        libc::sigprocmask(libc::SIG_BLOCK, &sigs, &mut old_mask);
        old_mask
    }
}

fn empty_sigset() -> libc::sigset_t {
    unsafe {
        let mut set = std::mem::zeroed();
        libc::sigemptyset(&mut set);
        set
    }
}

fn path_to_cstring(path: &Path) -> Result<CString, FileLockError> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| FileLockError::Creation(format!("path {:?} contains a NUL byte", path)))
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn lock_then_unlock_leaves_no_lock_or_link_file_behind() -> Result<(), FileLockError> {
        let dir = tempfile::tempdir().unwrap();
        let datafile = dir.path().join("mtab");
        std::fs::write(&datafile, "").unwrap();

        let mut lock = FileLock::new(&datafile)?;
        lock.lock()?;
        assert!(lock.is_locked());
        lock.unlock();

        assert!(!lock.linkfile.exists());
        assert!(!lock.lockfile.exists());
        Ok(())
    }

    #[test]
    fn simple_mode_locks_a_dedicated_lock_file() -> Result<(), FileLockError> {
        let dir = tempfile::tempdir().unwrap();
        let datafile = dir.path().join("utab");

        let mut lock = FileLock::new(&datafile)?;
        lock.set_mode(LockMode::Simple);
        assert!(lock.lockfile.to_string_lossy().ends_with(".lock"));
        lock.lock()?;
        lock.unlock();
        Ok(())
    }

    #[test]
    fn concurrent_hardlink_locks_serialize_across_threads() {
        let dir = tempfile::tempdir().unwrap();
        let datafile = dir.path().join("mtab");
        std::fs::write(&datafile, "0").unwrap();

        let barrier = Arc::new(Barrier::new(4));
        let datafile = Arc::new(datafile);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let datafile = Arc::clone(&datafile);
                thread::spawn(move || {
                    barrier.wait();
                    let mut lock = FileLock::new(datafile.as_path()).unwrap();
                    lock.lock().unwrap();
                    let contents = std::fs::read_to_string(datafile.as_path()).unwrap();
                    let next: u32 = contents.trim().parse().unwrap();
                    std::fs::write(datafile.as_path(), (next + 1).to_string()).unwrap();
                    lock.unlock();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let contents = std::fs::read_to_string(datafile.as_path()).unwrap();
        assert_eq!(contents.trim(), "4");
    }
}
