use std::path::Path;

use tracing::info;

use crate::{
    key_value_store::Entries,
    rdb::{RdbError, RdbParser},
};

/// Loads `<dir>/<dbfilename>`. A missing file is an empty keyspace.
pub async fn load_rdb_file(dir: &str, dbfilename: &str) -> Result<Entries, RdbError> {
    let path = Path::new(dir).join(dbfilename);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no snapshot found, starting with an empty keyspace");
            return Ok(Entries::new());
        }
        Err(e) => return Err(RdbError::Io(e.to_string())),
    };

    let snapshot = RdbParser::new(&bytes).parse()?;

    info!(
        path = %path.display(),
        version = %snapshot.version,
        keys = snapshot.entries.len(),
        "loaded snapshot"
    );

    Ok(snapshot.entries)
}
