// SPDX-FileCopyrightText: 2026 Taskmint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted at-rest credential persistence.
//!
//! One JSON document per deployment maps normalized provider ids to sealed
//! entries. Secrets are encrypted with a locally generated master key;
//! overwrites are atomic (temp-write-then-rename); the document and its
//! directory are restricted to the owner.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use taskmint_config::VaultConfig;
use taskmint_core::{ProviderId, TaskmintError};

use crate::crypto;
use crate::master_key;
use crate::record::{CredentialRecord, SealedValue, StoreDocument, StoredEntry};

/// The opened credential store, holding the master key in memory.
///
/// Debug output intentionally omits the master key.
pub struct CredentialStore {
    store_path: PathBuf,
    master_key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("store_path", &self.store_path)
            .field("master_key", &"[REDACTED]")
            .finish()
    }
}

impl CredentialStore {
    /// Open the store described by `config`, creating the data directory
    /// and master key on first use.
    pub fn open(config: &VaultConfig) -> Result<Self, TaskmintError> {
        let dir = resolve_data_dir(config)?;
        Self::open_at(&dir, config)
    }

    /// Open the store rooted at an explicit directory (used by tests).
    pub fn open_at(dir: &Path, config: &VaultConfig) -> Result<Self, TaskmintError> {
        ensure_private_dir(dir)?;
        let master_key = master_key::load_or_create(&dir.join(&config.key_file))?;
        info!(dir = %dir.display(), "credential store opened");
        Ok(Self {
            store_path: dir.join(&config.store_file),
            master_key,
        })
    }

    /// Seal and persist a record, overwriting any existing entry for the
    /// same provider atomically.
    pub async fn save(&self, record: &CredentialRecord) -> Result<(), TaskmintError> {
        let entry = self.seal_record(record)?;
        let mut doc = self.read_document().await?.unwrap_or_else(StoreDocument::empty);
        doc.providers.insert(record.provider.as_str().to_string(), entry);
        self.write_document(&doc).await?;
        debug!(provider = %record.provider, "credential record written");
        Ok(())
    }

    /// Load and decrypt the record for `provider`.
    ///
    /// Missing file or missing entry is `NotFound`; ciphertext that no
    /// longer opens under the master key is `Decryption`.
    pub async fn load(&self, provider: &ProviderId) -> Result<CredentialRecord, TaskmintError> {
        let doc = self.read_document().await?.ok_or_else(|| TaskmintError::NotFound {
            provider: provider.to_string(),
        })?;
        let entry = doc
            .providers
            .get(provider.as_str())
            .ok_or_else(|| TaskmintError::NotFound {
                provider: provider.to_string(),
            })?;
        self.unseal_entry(provider, entry)
    }

    /// Remove the record for `provider`, reporting whether one existed.
    pub async fn delete(&self, provider: &ProviderId) -> Result<bool, TaskmintError> {
        let Some(mut doc) = self.read_document().await? else {
            return Ok(false);
        };
        let existed = doc.providers.remove(provider.as_str()).is_some();
        if existed {
            self.write_document(&doc).await?;
            debug!(provider = %provider, "credential record deleted");
        }
        Ok(existed)
    }

    /// Known provider ids, read from metadata without decrypting anything.
    pub async fn list(&self) -> Result<Vec<ProviderId>, TaskmintError> {
        let Some(doc) = self.read_document().await? else {
            return Ok(Vec::new());
        };
        // Keys were normalized before insertion; re-parse defensively so a
        // hand-edited document cannot smuggle malformed ids back in.
        doc.providers.keys().map(|k| ProviderId::new(k)).collect()
    }

    fn seal_record(&self, record: &CredentialRecord) -> Result<StoredEntry, TaskmintError> {
        let secret = self.seal_value(record.secret.expose_secret())?;
        let previous_key = record
            .previous_key
            .as_ref()
            .map(|prev| self.seal_value(prev.expose_secret()))
            .transpose()?;
        Ok(StoredEntry {
            secret,
            previous_key,
            credential_type: record.credential_type,
            permission_level: record.permission_level,
            created_at: record.created_at,
            last_used: record.last_used,
            usage_count: record.usage_count,
            expires_at: record.expires_at,
            rotated_at: record.rotated_at,
            verification_proof: record.verification_proof.clone(),
        })
    }

    fn unseal_entry(
        &self,
        provider: &ProviderId,
        entry: &StoredEntry,
    ) -> Result<CredentialRecord, TaskmintError> {
        let secret = self.open_value(&entry.secret)?;
        let previous_key = entry
            .previous_key
            .as_ref()
            .map(|sealed| self.open_value(sealed))
            .transpose()?;
        Ok(CredentialRecord {
            provider: provider.clone(),
            secret,
            credential_type: entry.credential_type,
            permission_level: entry.permission_level,
            created_at: entry.created_at,
            last_used: entry.last_used,
            usage_count: entry.usage_count,
            expires_at: entry.expires_at,
            previous_key,
            rotated_at: entry.rotated_at,
            verification_proof: entry.verification_proof.clone(),
        })
    }

    fn seal_value(&self, plaintext: &str) -> Result<SealedValue, TaskmintError> {
        let (ciphertext, nonce) = crypto::seal(&self.master_key, plaintext.as_bytes())?;
        Ok(SealedValue {
            ciphertext: B64.encode(ciphertext),
            nonce: B64.encode(nonce),
        })
    }

    fn open_value(&self, sealed: &SealedValue) -> Result<SecretString, TaskmintError> {
        let ciphertext = B64
            .decode(&sealed.ciphertext)
            .map_err(|_| TaskmintError::Decryption("corrupted ciphertext encoding".to_string()))?;
        let nonce_vec = B64
            .decode(&sealed.nonce)
            .map_err(|_| TaskmintError::Decryption("corrupted nonce encoding".to_string()))?;
        let nonce: [u8; 12] = nonce_vec
            .try_into()
            .map_err(|_| TaskmintError::Decryption("corrupted nonce (expected 12 bytes)".to_string()))?;
        let plaintext = crypto::open(&self.master_key, &nonce, &ciphertext)?;
        let value = String::from_utf8(plaintext).map_err(|_| {
            TaskmintError::Decryption("decrypted value is not valid UTF-8".to_string())
        })?;
        Ok(SecretString::from(value))
    }

    /// Returns `None` when the document does not exist yet.
    async fn read_document(&self) -> Result<Option<StoreDocument>, TaskmintError> {
        let bytes = match tokio::fs::read(&self.store_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TaskmintError::storage(e)),
        };
        let doc = serde_json::from_slice(&bytes).map_err(TaskmintError::storage)?;
        Ok(Some(doc))
    }

    /// Serialize to a sibling temp file, then rename over the document so a
    /// crash mid-write never leaves a half-written store behind.
    async fn write_document(&self, doc: &StoreDocument) -> Result<(), TaskmintError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(TaskmintError::storage)?;
        let tmp_path = self.store_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(TaskmintError::storage)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(TaskmintError::storage)?;
        }
        tokio::fs::rename(&tmp_path, &self.store_path)
            .await
            .map_err(TaskmintError::storage)?;
        Ok(())
    }
}

/// Mask a secret value for display: shows up to four characters of prefix
/// and suffix with `...` in between. Short values are fully masked.
/// Operates on characters, not bytes, so multi-byte input cannot split.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

fn resolve_data_dir(config: &VaultConfig) -> Result<PathBuf, TaskmintError> {
    match &config.data_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => dirs::data_dir()
            .map(|d| d.join("taskmint"))
            .ok_or_else(|| TaskmintError::Config("no data directory available".to_string())),
    }
}

#[cfg(unix)]
fn ensure_private_dir(dir: &Path) -> Result<(), TaskmintError> {
    use std::os::unix::fs::DirBuilderExt;
    if !dir.exists() {
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)
            .map_err(TaskmintError::storage)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_private_dir(dir: &Path) -> Result<(), TaskmintError> {
    std::fs::create_dir_all(dir).map_err(TaskmintError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_test_store(dir: &Path) -> CredentialStore {
        CredentialStore::open_at(dir, &VaultConfig::default()).unwrap()
    }

    fn record(provider: &str, secret: &str) -> CredentialRecord {
        CredentialRecord::new(
            ProviderId::new(provider).unwrap(),
            SecretString::from(secret.to_string()),
        )
    }

    #[tokio::test]
    async fn save_then_load_round_trips_secret() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());

        store.save(&record("openai", "sk-test123")).await.unwrap();
        let loaded = store.load(&ProviderId::new("openai").unwrap()).await.unwrap();

        assert_eq!(loaded.secret.expose_secret(), "sk-test123");
        assert_eq!(loaded.usage_count, 0);
    }

    #[tokio::test]
    async fn load_missing_provider_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());

        let result = store.load(&ProviderId::new("anthropic").unwrap()).await;
        assert!(matches!(result, Err(TaskmintError::NotFound { .. })));
    }

    #[tokio::test]
    async fn save_overwrites_existing_entry() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());

        store.save(&record("openai", "first")).await.unwrap();
        store.save(&record("openai", "second-value")).await.unwrap();

        let loaded = store.load(&ProviderId::new("openai").unwrap()).await.unwrap();
        assert_eq!(loaded.secret.expose_secret(), "second-value");
    }

    #[tokio::test]
    async fn delete_reports_whether_entry_existed() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());
        let provider = ProviderId::new("openai").unwrap();

        assert!(!store.delete(&provider).await.unwrap());
        store.save(&record("openai", "sk-test123")).await.unwrap();
        assert!(store.delete(&provider).await.unwrap());
        assert!(matches!(
            store.load(&provider).await,
            Err(TaskmintError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_does_not_require_decryption() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());

        store.save(&record("openai", "sk-one")).await.unwrap();
        store.save(&record("Anthropic", "sk-two")).await.unwrap();

        let ids = store.list().await.unwrap();
        let names: Vec<&str> = ids.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["anthropic", "openai"]);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn changed_master_key_yields_decryption_error() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());
        store.save(&record("openai", "sk-test123")).await.unwrap();
        drop(store);

        // Replace the master key, simulating a lost/regenerated key file.
        std::fs::remove_file(dir.path().join("master.key")).unwrap();
        let store = open_test_store(dir.path());

        let result = store.load(&ProviderId::new("openai").unwrap()).await;
        assert!(matches!(result, Err(TaskmintError::Decryption(_))));
    }

    #[tokio::test]
    async fn corrupted_document_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());
        store.save(&record("openai", "sk-test123")).await.unwrap();

        std::fs::write(dir.path().join("credentials.json"), b"{not json").unwrap();
        let result = store.load(&ProviderId::new("openai").unwrap()).await;
        assert!(matches!(result, Err(TaskmintError::Storage { .. })));
    }

    #[tokio::test]
    async fn no_temp_file_left_after_save() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());
        store.save(&record("openai", "sk-test123")).await.unwrap();

        assert!(dir.path().join("credentials.json").exists());
        assert!(!dir.path().join("credentials.json.tmp").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn store_document_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());
        store.save(&record("openai", "sk-test123")).await.unwrap();

        let mode = std::fs::metadata(dir.path().join("credentials.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn rotation_fields_survive_persistence() {
        let dir = tempdir().unwrap();
        let store = open_test_store(dir.path());

        let mut rec = record("openai", "sk-test456");
        rec.previous_key = Some(SecretString::from("sk-test123".to_string()));
        rec.rotated_at = Some(chrono::Utc::now());
        store.save(&rec).await.unwrap();

        let loaded = store.load(&ProviderId::new("openai").unwrap()).await.unwrap();
        assert_eq!(loaded.secret.expose_secret(), "sk-test456");
        assert_eq!(
            loaded.previous_key.unwrap().expose_secret(),
            "sk-test123"
        );
        assert!(loaded.rotated_at.is_some());
    }

    #[test]
    fn mask_secret_previews() {
        assert_eq!(mask_secret("sk-test-abcdefghijkl"), "sk-t...ijkl");
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_handles_multibyte_input() {
        // Ends of the window landing inside a multi-byte character must
        // not panic or split it.
        assert_eq!(mask_secret("abcéxxxxxxxx"), "abcé...xxxx");
        assert_eq!(mask_secret("éééééééééééé"), "éééé...éééé");
        assert_eq!(mask_secret("clé-été"), "****");
    }
}
