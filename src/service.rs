use crate::common::RouterCertificate;
use crate::engine::{FilterEngine, FilteredCertificates};
use crate::error::AppError;
use crate::filter::{AddFilter, BgpsecFilter, FilterId, FilterSet};
use crate::slurm::SlurmFile;
use crate::store::FilterStore;
use futures::stream::{BoxStream, Stream};
use std::sync::Arc;
use tracing::{debug, info};

/// BGPsecフィルタの追加・削除・一覧・適用をまとめるサービス
///
/// ストアは起動時に注入する。全ての変更は1回のストアトランザクションで行う。
#[derive(Debug)]
pub struct FilterService<S> {
    store: Arc<S>,
}

impl<S> Clone for FilterService<S> {
    fn clone(&self) -> Self {
        FilterService {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FilterStore> FilterService<S> {
    pub fn new(store: Arc<S>) -> Self {
        FilterService { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// フィルタを追加してIDを返す
    ///
    /// 検証はID払い出しより前に行うため、不正な入力でIDは消費されない。
    pub async fn add(&self, command: AddFilter) -> Result<FilterId, AppError> {
        let filter = command.into_filter()?;
        let id = self.store.next_id().await?;
        debug!(%id, %filter, "adding BGPsec filter");

        let id = self
            .store
            .update(move |set| {
                set.push(id, filter);
                Ok(id)
            })
            .await?;
        info!(%id, "BGPsec filter added");
        Ok(id)
    }

    /// 指定IDのフィルタを削除する。存在しないIDは何もしない
    pub async fn remove(&self, id: FilterId) -> Result<(), AppError> {
        let removed = self.store.update(move |set| Ok(set.remove(id))).await?;
        if removed {
            info!(%id, "BGPsec filter removed");
        } else {
            debug!(%id, "no BGPsec filter with this id, nothing removed");
        }
        Ok(())
    }

    /// 現時点のスナップショットに基づくフィルタ一覧 (挿入順)
    pub async fn list(&self) -> Result<FilterListing, AppError> {
        Ok(FilterListing::new(self.store.read().await?))
    }

    /// IDつきの一覧
    pub async fn entries(&self) -> Result<FilterEntries, AppError> {
        Ok(FilterEntries::new(self.store.read().await?))
    }

    /// 全フィルタを削除する
    pub async fn clear(&self) -> Result<(), AppError> {
        let cleared = self
            .store
            .update(|set| {
                let count = set.len();
                set.clear();
                Ok(count)
            })
            .await?;
        info!(cleared, "BGPsec filters cleared");
        Ok(())
    }

    /// 呼び出し時点のフィルタ集合から判定器を作る
    pub async fn snapshot_engine(&self) -> Result<FilterEngine, AppError> {
        let snapshot = self.store.read().await?;
        let engine = FilterEngine::from_set(&snapshot);
        debug!(filters = engine.len(), "BGPsec filter snapshot taken");
        Ok(engine)
    }

    /// 証明書ストリームにフィルタを適用する
    ///
    /// スナップショットはこの呼び出しの時点で取得する。
    /// 以降のフィルタ変更は返したストリームに影響しない。
    pub async fn apply<St, E>(
        &self,
        input: St,
    ) -> Result<BoxStream<'static, Result<RouterCertificate, E>>, AppError>
    where
        St: Stream<Item = Result<RouterCertificate, E>> + Send + 'static,
        E: Send + 'static,
    {
        Ok(self.snapshot_engine().await?.filter_stream(input))
    }

    /// `apply` のイテレータ版
    pub async fn apply_iter<I>(
        &self,
        input: I,
    ) -> Result<FilteredCertificates<I::IntoIter>, AppError>
    where
        I: IntoIterator<Item = RouterCertificate>,
    {
        Ok(self.snapshot_engine().await?.filter_iter(input))
    }

    /// 現在のBGPsecフィルタをSLURMドキュメントとして書き出す
    pub async fn export_slurm(&self) -> Result<SlurmFile, AppError> {
        let snapshot = self.store.read().await?;
        Ok(SlurmFile::from_filters(snapshot.filters()))
    }

    /// SLURMドキュメントのBGPsecフィルタで現在の集合を置き換える
    ///
    /// 全件を検証してから1トランザクションで入れ替えるので、途中で失敗しても変更は残らない。
    pub async fn import_slurm(&self, file: &SlurmFile) -> Result<usize, AppError> {
        let filters = file.bgpsec_filters()?;

        let mut replacement = FilterSet::new();
        for filter in filters {
            replacement.push(self.store.next_id().await?, filter);
        }
        let count = replacement.len();

        self.store
            .update(move |set| {
                *set = replacement;
                Ok(())
            })
            .await?;
        info!(count, "BGPsec filters imported from SLURM");
        Ok(count)
    }
}

/// スナップショットを保持した遅延列挙
#[derive(Debug, Clone)]
pub struct FilterListing {
    snapshot: Arc<FilterSet>,
    pos: usize,
}

impl FilterListing {
    fn new(snapshot: Arc<FilterSet>) -> Self {
        FilterListing { snapshot, pos: 0 }
    }
}

impl Iterator for FilterListing {
    type Item = BgpsecFilter;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, filter) = self.snapshot.entry(self.pos)?;
        self.pos += 1;
        Some(filter.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.snapshot.len().saturating_sub(self.pos);
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for FilterListing {}

#[derive(Debug, Clone)]
pub struct FilterEntries {
    snapshot: Arc<FilterSet>,
    pos: usize,
}

impl FilterEntries {
    fn new(snapshot: Arc<FilterSet>) -> Self {
        FilterEntries { snapshot, pos: 0 }
    }
}

impl Iterator for FilterEntries {
    type Item = (FilterId, BgpsecFilter);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.snapshot.entry(self.pos)?.clone();
        self.pos += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.snapshot.len().saturating_sub(self.pos);
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for FilterEntries {}
