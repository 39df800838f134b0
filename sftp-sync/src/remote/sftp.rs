//! SFTP implementation of [`RemoteStore`] on top of libssh2.
//!
//! Every operation opens its own SSH session, so one broken connection only
//! costs the folder that hit it.

use super::path::join_remote;
use super::{sort_newest_first, RemoteFileDescriptor, RemoteStore};
use crate::config::Credentials;
use crate::utils::errors::{Result, SyncError};
use chrono::{DateTime, TimeZone, Utc};
use ssh2::{FileStat, Session};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

pub struct SftpRemote {
    credentials: Credentials,
}

impl SftpRemote {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    fn connect(&self) -> Result<Session> {
        let creds = &self.credentials;
        let tcp = TcpStream::connect((creds.host.as_str(), creds.port))?;
        let mut sess = Session::new()?;
        sess.set_tcp_stream(tcp);
        sess.handshake()?;

        match (&creds.private_key, &creds.password) {
            (Some(key), _) => sess
                .userauth_pubkey_file(&creds.username, None, key, creds.passphrase.as_deref())
                .map_err(|e| SyncError::Authentication(e.to_string()))?,
            (None, Some(password)) => sess
                .userauth_password(&creds.username, password)
                .map_err(|e| SyncError::Authentication(e.to_string()))?,
            (None, None) => {
                return Err(SyncError::Authentication(
                    "no password or private key configured".to_string(),
                ))
            }
        }

        if !sess.authenticated() {
            return Err(SyncError::Authentication(format!(
                "server rejected user {}",
                creds.username
            )));
        }

        Ok(sess)
    }

    fn read_listing(&self, remote_path: &str) -> Result<Vec<RemoteFileDescriptor>> {
        let sess = self.connect()?;
        let sftp = sess.sftp()?;
        let mut files: Vec<RemoteFileDescriptor> = sftp
            .readdir(Path::new(remote_path))?
            .iter()
            .filter_map(|(path, stat)| descriptor_from_stat(path, stat))
            .collect();
        sort_newest_first(&mut files);
        Ok(files)
    }

    fn fetch(&self, source: &str, partial: &Path, destination: &Path) -> Result<()> {
        let sess = self.connect()?;
        let sftp = sess.sftp()?;
        let mut remote_file = sftp.open(Path::new(source))?;

        let mut local_file = fs::File::create(partial)?;
        io::copy(&mut remote_file, &mut local_file)?;
        local_file.sync_all()?;
        drop(local_file);

        fs::rename(partial, destination)?;
        Ok(())
    }
}

impl RemoteStore for SftpRemote {
    fn list_files(&self, remote_path: &str) -> Result<Vec<RemoteFileDescriptor>> {
        self.read_listing(remote_path).map_err(|e| SyncError::Listing {
            remote_path: remote_path.to_string(),
            reason: e.to_string(),
        })
    }

    fn download(&self, name: &str, remote_path: &str, destination: &Path) -> Result<PathBuf> {
        let source = join_remote(remote_path, name);
        let partial = partial_path(destination);

        if let Err(e) = self.fetch(&source, &partial, destination) {
            // a leftover would otherwise be pruned as a stale file next run
            let _ = fs::remove_file(&partial);
            return Err(SyncError::Download {
                remote_path: source,
                reason: e.to_string(),
            });
        }

        Ok(destination.to_path_buf())
    }
}

/// Build a descriptor for regular files; directories, links and the `.`/`..`
/// entries yield `None`. Servers may omit the permission bits, in which case
/// the entry is taken to be a file.
fn descriptor_from_stat(path: &Path, stat: &FileStat) -> Option<RemoteFileDescriptor> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    if name == "." || name == ".." || (stat.perm.is_some() && !stat.is_file()) {
        return None;
    }

    let modified: DateTime<Utc> = stat
        .mtime
        .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
        .unwrap_or_default();

    Some(RemoteFileDescriptor {
        name,
        size: stat.size.unwrap_or(0),
        modified,
    })
}

/// Temporary name a download is streamed into before it is renamed.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name: OsString = destination.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    destination.with_file_name(name)
}
