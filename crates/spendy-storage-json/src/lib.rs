use std::{
    fmt::Write as _,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use spendy_core::{storage::sort_newest_first, StoreError, TransactionStore};
use spendy_domain::{NewTransaction, OwnerId, Transaction, TransactionId};
use tracing::debug;

pub const DOCUMENT_SCHEMA_VERSION: u32 = 1;
const DOCUMENT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// On-disk shape of one owner's transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDocument {
    pub schema_version: u32,
    pub owner_id: OwnerId,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl TransactionDocument {
    pub fn empty(owner_id: OwnerId) -> Self {
        Self {
            schema_version: DOCUMENT_SCHEMA_VERSION,
            owner_id,
            transactions: Vec::new(),
        }
    }
}

/// Filesystem-backed JSON store keeping one document per owner.
#[derive(Debug)]
pub struct JsonTransactionStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonTransactionStore {
    pub fn new(root: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, owner: &OwnerId) -> PathBuf {
        self.root.join(format!(
            "{}.{}",
            document_stem(owner.as_str()),
            DOCUMENT_EXTENSION
        ))
    }

    /// Reads an owner's document; a missing file is an empty history.
    pub fn load_document(&self, owner: &OwnerId) -> Result<TransactionDocument, StoreError> {
        let path = self.document_path(owner);
        if !path.exists() {
            return Ok(TransactionDocument::empty(owner.clone()));
        }
        let document = load_document_from_path(&path)?;
        if &document.owner_id != owner {
            return Err(StoreError::Server(format!(
                "document `{}` belongs to `{}`",
                path.display(),
                document.owner_id
            )));
        }
        if let Some(stray) = document.transactions.iter().find(|txn| &txn.owner_id != owner) {
            return Err(StoreError::Serde(format!(
                "transaction {} in `{}` belongs to `{}`",
                stray.id,
                path.display(),
                stray.owner_id
            )));
        }
        Ok(document)
    }

    fn save_document(&self, document: &TransactionDocument) -> Result<(), StoreError> {
        let path = self.document_path(&document.owner_id);
        let tmp = tmp_path(&path);
        write_file(&tmp, &serialize_document(document)?)?;
        fs::rename(&tmp, &path)?;
        debug!(
            user = %document.owner_id,
            count = document.transactions.len(),
            path = %path.display(),
            "saved transaction document"
        );
        Ok(())
    }
}

impl TransactionStore for JsonTransactionStore {
    fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<Transaction>, StoreError> {
        let mut transactions = self.load_document(owner)?.transactions;
        sort_newest_first(&mut transactions);
        debug!(user = %owner, count = transactions.len(), "fetched transactions from disk");
        Ok(transactions)
    }

    fn create_transaction(
        &self,
        owner: &OwnerId,
        fields: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .expect("JsonTransactionStore lock poisoned");
        let mut document = self.load_document(owner)?;
        let txn = Transaction::from_new(TransactionId::new(), owner.clone(), fields);
        document.transactions.push(txn.clone());
        self.save_document(&document)?;
        Ok(txn)
    }
}

/// Loads and version-checks a document from an arbitrary path.
pub fn load_document_from_path(path: &Path) -> Result<TransactionDocument, StoreError> {
    let data = fs::read_to_string(path)?;
    let document: TransactionDocument =
        serde_json::from_str(&data).map_err(|err| StoreError::Serde(err.to_string()))?;
    if document.schema_version > DOCUMENT_SCHEMA_VERSION {
        return Err(StoreError::Serde(format!(
            "unsupported schema version {} (expected <= {})",
            document.schema_version, DOCUMENT_SCHEMA_VERSION
        )));
    }
    Ok(document)
}

/// File stem for an owner's document.
///
/// Lowercase letters, digits and `-` are kept; every other byte becomes `_xx`
/// (lowercase hex), behind a `u` prefix so the stem is never empty. Distinct
/// owner ids always map to distinct stems, even on case-insensitive filesystems.
fn document_stem(owner: &str) -> String {
    let mut stem = String::with_capacity(owner.len() + 1);
    stem.push('u');
    for byte in owner.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(char::from(byte)),
            _ => {
                let _ = write!(stem, "_{:02x}", byte);
            }
        }
    }
    stem
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_document(document: &TransactionDocument) -> Result<String, StoreError> {
    serde_json::to_string_pretty(document).map_err(|err| StoreError::Serde(err.to_string()))
}
