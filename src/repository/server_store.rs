use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::debug;

use crate::model::{ServerCredential, StoredServer};
use crate::xtream_grab_error::{
    create_xtream_grab_error, create_xtream_grab_error_result, XtreamGrabError, XtreamGrabErrorKind,
};

/// Json-file backed store for registered server credentials. Insertion
/// order is list order; ids are monotonically assigned and never reused
/// within one file lifetime.
pub struct ServerStore {
    path: PathBuf,
    servers: Vec<StoredServer>,
}

impl ServerStore {
    /// A missing file is an empty store, not an error.
    pub fn load(path: &Path) -> Result<Self, XtreamGrabError> {
        let servers = if path.exists() {
            let file = File::open(path).map_err(|err| {
                create_xtream_grab_error!(
                    XtreamGrabErrorKind::Io,
                    "cant open server store {}: {err}",
                    path.display()
                )
            })?;
            serde_json::from_reader(file).map_err(|err| {
                create_xtream_grab_error!(
                    XtreamGrabErrorKind::Parse,
                    "cant read server store {}: {err}",
                    path.display()
                )
            })?
        } else {
            debug!("no server store at {}, starting empty", path.display());
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            servers,
        })
    }

    pub fn create(&mut self, credential: &ServerCredential) -> Result<StoredServer, XtreamGrabError> {
        if credential.url.is_empty() || credential.username.is_empty() || credential.password.is_empty() {
            return create_xtream_grab_error_result!(
                XtreamGrabErrorKind::Validation,
                "url, username and password are required"
            );
        }
        let duplicate = self
            .servers
            .iter()
            .any(|s| s.url == credential.url && s.username == credential.username);
        if duplicate {
            return create_xtream_grab_error_result!(
                XtreamGrabErrorKind::Validation,
                "server with url {} and username {} already exists",
                credential.url,
                credential.username
            );
        }
        let server = StoredServer {
            id: self.servers.iter().map(|s| s.id).max().unwrap_or(0) + 1,
            url: credential.url.clone(),
            username: credential.username.clone(),
            password: credential.password.clone(),
            created_at: Utc::now().timestamp(),
        };
        self.servers.push(server.clone());
        self.persist()?;
        Ok(server)
    }

    pub fn list(&self) -> &[StoredServer] {
        &self.servers
    }

    pub fn get(&self, id: u32) -> Option<&StoredServer> {
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn delete(&mut self, id: u32) -> Result<(), XtreamGrabError> {
        let index = self.servers.iter().position(|s| s.id == id);
        match index {
            Some(index) => {
                self.servers.remove(index);
                self.persist()
            }
            None => create_xtream_grab_error_result!(
                XtreamGrabErrorKind::NotFound,
                "no server with id {id}"
            ),
        }
    }

    fn persist(&self) -> Result<(), XtreamGrabError> {
        let file = File::create(&self.path).map_err(|err| {
            create_xtream_grab_error!(
                XtreamGrabErrorKind::Io,
                "cant write server store {}: {err}",
                self.path.display()
            )
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.servers).map_err(|err| {
            create_xtream_grab_error!(
                XtreamGrabErrorKind::Io,
                "cant serialize server store: {err}"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xtream_grab_error::XtreamGrabErrorKind;

    fn credential(url: &str, username: &str) -> ServerCredential {
        ServerCredential::new(url, username, "secret")
    }

    #[test]
    fn test_create_list_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let mut store = ServerStore::load(&path).unwrap();
        assert!(store.list().is_empty());

        let first = store.create(&credential("http://a.co", "u1")).unwrap();
        let second = store.create(&credential("http://b.co", "u1")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let reloaded = ServerStore::load(&path).unwrap();
        assert_eq!(reloaded.list().len(), 2);
        assert_eq!(reloaded.get(2).unwrap().url, "http://b.co");

        let mut store = reloaded;
        store.delete(1).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].id, 2);
    }

    #[test]
    fn test_duplicate_url_username_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let mut store = ServerStore::load(&path).unwrap();
        store.create(&credential("http://a.co", "u1")).unwrap();
        let err = store.create(&credential("http://a.co", "u1")).unwrap_err();
        assert_eq!(err.kind, XtreamGrabErrorKind::Validation);
        // same url, different user is fine
        store.create(&credential("http://a.co", "u2")).unwrap();
    }

    #[test]
    fn test_unwritable_store_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("servers.json");
        let mut store = ServerStore::load(&path).unwrap();
        let err = store.create(&credential("http://a.co", "u1")).unwrap_err();
        assert_eq!(err.kind, XtreamGrabErrorKind::Io);
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let mut store = ServerStore::load(&path).unwrap();
        let err = store.delete(99).unwrap_err();
        assert_eq!(err.kind, XtreamGrabErrorKind::NotFound);
    }
}
