//! SLURMストア (BGPsecフィルタ部分)
//!
//! `FilterStore` はサービスに注入するコラボレータ。
//! `SlurmStore` はメモリ上、またはJSONファイルに永続化する実装。

use crate::constants::FIRST_FILTER_ID;
use crate::error::AppError;
use crate::filter::{BgpsecFilter, FilterId, FilterSet};
use crate::slurm::SlurmBgpsecFilter;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, info, warn};

/// フィルタ集合を保持するストアの契約
pub trait FilterStore: Send + Sync {
    /// 新しいIDを払い出す (再利用しない)
    fn next_id(&self) -> impl Future<Output = Result<FilterId, AppError>> + Send;

    /// 排他アクセスで tx を実行する
    ///
    /// tx が Ok を返せばコミット、Err なら変更を破棄する。
    fn update<R, F>(&self, tx: F) -> impl Future<Output = Result<R, AppError>> + Send
    where
        F: FnOnce(&mut FilterSet) -> Result<R, AppError> + Send,
        R: Send;

    /// 一貫したスナップショットを返す
    fn read(&self) -> impl Future<Output = Result<Arc<FilterSet>, AppError>> + Send;
}

/// 永続化ファイルの形式
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    bgpsec_filters: Vec<StoredFilter>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredFilter {
    id: FilterId,
    #[serde(flatten)]
    filter: SlurmBgpsecFilter,
}

/// メモリ上 or JSONファイルのSLURMストア
///
/// 書き込みは writer ロックで直列化し、コミット時に `current` のArcを差し替える。
/// 読み込みはArcを複製するだけなので、更新前か更新後のどちらかが必ず見える。
#[derive(Debug)]
pub struct SlurmStore {
    path: Option<PathBuf>,
    current: Arc<RwLock<Arc<FilterSet>>>,
    writer: Mutex<()>,
    next_id: AtomicU64,
    revision: Arc<AtomicU64>,
}

impl SlurmStore {
    /// 永続化しないストア
    pub fn in_memory() -> Self {
        SlurmStore::with_state(None, FilterSet::new(), FIRST_FILTER_ID)
    }

    /// JSONファイルを開く。存在しなければ空のストアとして扱う
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "store file not found, starting empty");
                return Ok(SlurmStore::with_state(
                    Some(path),
                    FilterSet::new(),
                    FIRST_FILTER_ID,
                ));
            }
            Err(e) => {
                return Err(AppError::StoreUnavailable(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let state: PersistedState = serde_json::from_str(&text).map_err(|e| {
            AppError::StoreUnavailable(format!("failed to decode {}: {e}", path.display()))
        })?;

        let mut set = FilterSet::new();
        for stored in state.bgpsec_filters {
            let filter = BgpsecFilter::try_from(stored.filter).map_err(|e| {
                AppError::StoreUnavailable(format!(
                    "invalid filter {} in {}: {e}",
                    stored.id,
                    path.display()
                ))
            })?;
            if set.get(stored.id).is_some() {
                return Err(AppError::StoreUnavailable(format!(
                    "duplicate filter id {} in {}",
                    stored.id,
                    path.display()
                )));
            }
            set.push(stored.id, filter);
        }

        // 保存済みのnextIdより大きいIDが既にあれば、その次から払い出す
        let after_max = match set.max_id() {
            Some(id) => id.get().checked_add(1).ok_or_else(|| {
                AppError::StoreUnavailable(format!(
                    "filter id {id} in {} leaves no room for new ids",
                    path.display()
                ))
            })?,
            None => FIRST_FILTER_ID,
        };
        let next_id = state.next_id.max(after_max).max(FIRST_FILTER_ID);

        info!(
            path = %path.display(),
            filters = set.len(),
            next_id,
            "loaded BGPsec filter store"
        );
        Ok(SlurmStore::with_state(Some(path), set, next_id))
    }

    fn with_state(path: Option<PathBuf>, set: FilterSet, next_id: u64) -> Self {
        SlurmStore {
            path,
            current: Arc::new(RwLock::new(Arc::new(set))),
            writer: Mutex::new(()),
            next_id: AtomicU64::new(next_id),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// コミット済みの書き込み回数
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}

fn encode_state(next_id: u64, set: &FilterSet) -> Result<String, AppError> {
    let state = PersistedState {
        next_id,
        bgpsec_filters: set
            .iter()
            .map(|(id, filter)| StoredFilter {
                id: *id,
                filter: SlurmBgpsecFilter::from(filter),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&state)
        .map_err(|e| AppError::StoreUnavailable(format!("failed to encode store: {e}")))?;
    Ok(format!("{json}\n"))
}

/// 一時ファイルに書いてからrenameする (blockingスレッドから呼ぶ)
fn write_state_file(path: &Path, content: &str) -> Result<(), AppError> {
    let tmp_path = tmp_path_for(path);
    let unavailable = |e: std::io::Error| {
        AppError::StoreUnavailable(format!("failed to write {}: {e}", path.display()))
    };
    std::fs::write(&tmp_path, content).map_err(unavailable)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        // 後片付けに失敗しても元のエラーを返す
        let _ = std::fs::remove_file(&tmp_path);
        return Err(unavailable(e));
    }
    Ok(())
}

/// 新しい集合を公開してリビジョンを進める
fn publish(
    mut current: OwnedRwLockWriteGuard<Arc<FilterSet>>,
    draft: FilterSet,
    revision: &AtomicU64,
) -> u64 {
    *current = Arc::new(draft);
    revision.fetch_add(1, Ordering::SeqCst) + 1
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl FilterStore for SlurmStore {
    async fn next_id(&self) -> Result<FilterId, AppError> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map(FilterId::new)
            .map_err(|_| AppError::StoreUnavailable("filter id space exhausted".to_string()))
    }

    async fn update<R, F>(&self, tx: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut FilterSet) -> Result<R, AppError> + Send,
        R: Send,
    {
        let _guard = self.writer.lock().await;

        let base = self.current.read().await.clone();
        let mut draft = FilterSet::clone(&base);

        let result = tx(&mut draft)?;

        // 変更が無ければ書き込まない
        if draft == *base {
            debug!("transaction made no changes, skipping write");
            return Ok(result);
        }

        let current = Arc::clone(&self.current).write_owned().await;

        let revision = match &self.path {
            None => publish(current, draft, &self.revision),
            Some(path) => {
                let content = encode_state(self.next_id.load(Ordering::SeqCst), &draft)?;
                let path = path.clone();
                let revision = Arc::clone(&self.revision);

                // ファイル書き込みと公開は同じタスクで行う (呼び出し側のキャンセルで分断されない)
                let committed = tokio::task::spawn_blocking(move || {
                    write_state_file(&path, &content)?;
                    Ok::<u64, AppError>(publish(current, draft, &revision))
                })
                .await
                .map_err(|e| {
                    AppError::StoreUnavailable(format!("store writer task failed: {e}"))
                })?;

                match committed {
                    Ok(revision) => revision,
                    Err(e) => {
                        warn!(error = %e, "store write failed, transaction rolled back");
                        return Err(e);
                    }
                }
            }
        };
        debug!(revision, "store transaction committed");
        Ok(result)
    }

    async fn read(&self) -> Result<Arc<FilterSet>, AppError> {
        Ok(self.current.read().await.clone())
    }
}
