//! Page-load orchestration and the read-only snapshot handed to the
//! rendering layer.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::errors::{ErrorView, ServiceError};
use crate::i18n::{page_language, resolve_language, TranslationSelector};
use crate::models::{BizLocation, Brand, Event, ItemTrace, Lot, Product};
use crate::query::PassportQuery;
use crate::services::compliance::{certification_rows, CertificationRow};
use crate::services::events::{event_rows, format_issue_date, EventRow};
use crate::services::location::{extract_primary_location, LocationDetails, LocationDeriver};
use crate::services::nutrition::NutritionFacts;
use crate::services::provenance::{ProvenanceRow, ProvenanceWalker};
use crate::sources::{ItemTraceApi, PreviewSource, RecordSource, ScanRecorder};

pub const COOKIE_CONSENT_ACCEPTED: &str = "accepted";
pub const COOKIE_CONSENT_DECLINED: &str = "declined";

/// Browser-held visitor state, supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub cookie_consent: Option<String>,
    pub local_user: Option<String>,
}

impl ClientState {
    pub fn new(cookie_consent: Option<&str>, local_user: Option<&str>) -> Self {
        Self {
            cookie_consent: cookie_consent.map(str::to_string),
            local_user: local_user.filter(|u| !u.is_empty()).map(str::to_string),
        }
    }

    /// A visitor who accepted cookies on an earlier visit and was assigned
    /// a local user id then.
    pub fn returning_user(&self) -> Option<&str> {
        if self.cookie_consent.as_deref() == Some(COOKIE_CONSENT_ACCEPTED) {
            self.local_user.as_deref()
        } else {
            None
        }
    }

    /// State after the visitor accepts cookies. The first scan id seen
    /// becomes the local user id; an existing id is kept.
    pub fn accepted(&self, scan_id: Option<&str>) -> Self {
        Self {
            cookie_consent: Some(COOKIE_CONSENT_ACCEPTED.to_string()),
            local_user: self
                .local_user
                .clone()
                .or_else(|| scan_id.filter(|id| !id.is_empty()).map(str::to_string)),
        }
    }

    pub fn declined(&self) -> Self {
        Self {
            cookie_consent: Some(COOKIE_CONSENT_DECLINED.to_string()),
            local_user: self.local_user.clone(),
        }
    }
}

/// Everything computed from a record for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedFields {
    pub location_details: LocationDetails,
    pub nutrition: Option<NutritionFacts>,
    pub product_description: Option<String>,
    pub certifications: Vec<CertificationRow>,
    pub issue_date: String,
    pub event_rows: Vec<EventRow>,
    pub material_provenance: Vec<ProvenanceRow>,
}

/// Derivation settings shared by every snapshot of one page.
#[derive(Debug, Clone)]
pub struct Derivers {
    pub language: String,
    pub location: LocationDeriver,
    pub provenance: ProvenanceWalker,
}

impl Default for Derivers {
    fn default() -> Self {
        Self::for_language(crate::config::DEFAULT_LANGUAGE)
    }
}

impl Derivers {
    pub fn for_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
            location: LocationDeriver::default(),
            provenance: ProvenanceWalker::default(),
        }
    }

    pub fn derive(&self, record: &ItemTrace) -> DerivedFields {
        let product = record.product_join_key.as_ref();
        let selector = TranslationSelector::for_language(&self.language);

        DerivedFields {
            location_details: self.location.transform(extract_primary_location(record)),
            nutrition: product.map(NutritionFacts::derive),
            product_description: product
                .and_then(|p| selector.select(&p.translations, None))
                .and_then(|t| t.product_description.clone()),
            certifications: product
                .map(|p| certification_rows(&p.certifications))
                .unwrap_or_default(),
            issue_date: format_issue_date(record.commission_time.as_deref()),
            event_rows: event_rows(&record.events),
            material_provenance: record
                .lgtin_join_key
                .as_ref()
                .map(|lot| self.provenance.walk(lot))
                .unwrap_or_default(),
        }
    }
}

/// Memoizes derived fields per record instance. Derivation reruns only when
/// a different `Arc` is presented, not when an equal record is.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    derivers: Derivers,
    last: Option<(Arc<ItemTrace>, Arc<DerivedFields>)>,
    computations: usize,
}

impl SnapshotCache {
    pub fn new(derivers: Derivers) -> Self {
        Self {
            derivers,
            last: None,
            computations: 0,
        }
    }

    pub fn derivers(&self) -> &Derivers {
        &self.derivers
    }

    /// Switching language invalidates the memoized fields.
    pub fn set_language(&mut self, language: &str) {
        if self.derivers.language != language {
            self.derivers.language = language.to_string();
            self.last = None;
        }
    }

    pub fn derive(&mut self, record: &Arc<ItemTrace>) -> Arc<DerivedFields> {
        if let Some((cached_record, fields)) = &self.last {
            if Arc::ptr_eq(cached_record, record) {
                return Arc::clone(fields);
            }
        }

        let fields = Arc::new(self.derivers.derive(record));
        self.computations += 1;
        self.last = Some((Arc::clone(record), Arc::clone(&fields)));
        fields
    }

    /// How many times derivation actually ran.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn snapshot(&mut self, record: Option<Arc<ItemTrace>>) -> PassportSnapshot {
        let derived = record.as_ref().map(|r| self.derive(r));
        PassportSnapshot {
            is_loading: false,
            error: None,
            record,
            derived,
        }
    }
}

/// The three states a page load can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Error,
    /// Loaded; the record may still be absent (the "not found" state).
    Loaded,
}

/// Read-only result of one page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassportSnapshot {
    pub is_loading: bool,
    pub error: Option<ErrorView>,
    record: Option<Arc<ItemTrace>>,
    #[serde(flatten)]
    derived: Option<Arc<DerivedFields>>,
}

impl PassportSnapshot {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            error: None,
            record: None,
            derived: None,
        }
    }

    pub fn failed(error: ErrorView) -> Self {
        Self {
            is_loading: false,
            error: Some(error),
            record: None,
            derived: None,
        }
    }

    pub fn state(&self) -> LoadState {
        match (self.is_loading, &self.error) {
            (true, _) => LoadState::Loading,
            (false, Some(_)) => LoadState::Error,
            (false, None) => LoadState::Loaded,
        }
    }

    /// Loaded, but no record was available to show.
    pub fn is_not_found(&self) -> bool {
        self.state() == LoadState::Loaded && self.record.is_none()
    }

    pub fn record(&self) -> Option<&Arc<ItemTrace>> {
        self.record.as_ref()
    }

    pub fn derived(&self) -> Option<&DerivedFields> {
        self.derived.as_deref()
    }

    pub fn product(&self) -> Option<&Product> {
        self.record.as_ref()?.product_join_key.as_ref()
    }

    pub fn brand(&self) -> Option<&Brand> {
        self.product()?.brand.as_ref()
    }

    pub fn lot(&self) -> Option<&Lot> {
        self.record.as_ref()?.lgtin_join_key.as_ref()
    }

    pub fn commission_location(&self) -> Option<&BizLocation> {
        self.record.as_ref()?.commission_location_join_key.as_ref()
    }

    pub fn last_seen_location(&self) -> Option<&BizLocation> {
        self.record.as_ref()?.last_seen_biz_location_join_key.as_ref()
    }

    pub fn expected_location(&self) -> Option<&BizLocation> {
        self.record.as_ref()?.expected_biz_location_join_key.as_ref()
    }

    pub fn parent(&self) -> Option<&ItemTrace> {
        self.record.as_ref()?.parent()
    }

    pub fn children(&self) -> &[ItemTrace] {
        self.record
            .as_deref()
            .map(|r| r.children.as_slice())
            .unwrap_or_default()
    }

    pub fn events(&self) -> &[Event] {
        self.record
            .as_deref()
            .map(|r| r.events.as_slice())
            .unwrap_or_default()
    }

    pub fn serial(&self) -> Option<&str> {
        self.record.as_ref()?.serial.as_deref()
    }

    pub fn lot_number(&self) -> Option<&str> {
        self.record.as_ref()?.lot_number.as_deref()
    }

    pub fn gtin(&self) -> Option<&str> {
        self.record.as_ref()?.gtin()
    }

    pub fn disposition(&self) -> Option<&str> {
        self.record.as_ref()?.current_disposition.as_deref()
    }

    pub fn last_biz_step(&self) -> Option<&str> {
        self.record.as_ref()?.last_biz_step.as_deref()
    }

    pub fn commission_time(&self) -> Option<&str> {
        self.record.as_ref()?.commission_time.as_deref()
    }

    pub fn location_details(&self) -> Option<&LocationDetails> {
        self.derived().map(|d| &d.location_details)
    }
}

/// Runs one page load: validates the query, records returning visitors,
/// then resolves the record from the preview document or the API.
pub struct PassportLoader {
    api: Arc<dyn RecordSource>,
    scans: Option<Arc<dyn ScanRecorder>>,
    preview: PreviewSource,
    support_email: Option<String>,
    default_language: String,
    cache: SnapshotCache,
}

impl PassportLoader {
    pub fn new(api: Arc<dyn RecordSource>, preview: PreviewSource) -> Self {
        Self {
            api,
            scans: None,
            preview,
            support_email: None,
            default_language: crate::config::DEFAULT_LANGUAGE.to_string(),
            cache: SnapshotCache::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let api = Arc::new(ItemTraceApi::new(config)?);
        let loader = Self::new(api.clone(), PreviewSource::new(config.preview_path()))
            .with_scan_recorder(api)
            .with_support_email(config.support_email.clone())
            .with_default_language(&config.default_language);
        Ok(loader)
    }

    pub fn with_scan_recorder(mut self, scans: Arc<dyn ScanRecorder>) -> Self {
        self.scans = Some(scans);
        self
    }

    pub fn with_support_email(mut self, support_email: Option<String>) -> Self {
        self.support_email = support_email;
        self
    }

    pub fn with_default_language(mut self, language: &str) -> Self {
        self.default_language = language.to_string();
        self
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Loads a page for `language` (falls back to the configured default
    /// when absent or unsupported). Failures become a terminal error state.
    pub async fn load(
        &mut self,
        query: &PassportQuery,
        client: &ClientState,
        language: Option<&str>,
    ) -> PassportSnapshot {
        let language = resolve_language(language, &self.default_language);
        self.cache.set_language(&language);

        match self.resolve_record(query, client).await {
            Ok(record) => self.cache.snapshot(record.map(Arc::new)),
            Err(err) => {
                error!(code = err.code(), error = %err, "Failed to fetch item trace data");
                PassportSnapshot::failed(ErrorView::from_error(&err, self.support_email.as_deref()))
            }
        }
    }

    /// Loads a page in the language a visitor would get: a supported stored
    /// choice first, then the browser's ordered preferences.
    pub async fn load_negotiated<S: AsRef<str>>(
        &mut self,
        query: &PassportQuery,
        client: &ClientState,
        stored_language: Option<&str>,
        browser_languages: &[S],
    ) -> PassportSnapshot {
        let language = page_language(stored_language, browser_languages, &self.default_language);
        self.load(query, client, Some(&language)).await
    }

    /// Records cookie acceptance. A visitor without a local user id adopts
    /// the page's scan id, and that scan is attributed to it.
    pub async fn accept_consent(&self, query: &PassportQuery, client: &ClientState) -> ClientState {
        let scan_id = query.scan_id.as_deref();
        let accepted = client.accepted(scan_id);

        if client.local_user.is_none() {
            if let (Some(scan_id), Some(scans)) = (scan_id, self.scans.as_ref()) {
                info!(scan_id, "New user detected, saved scan id as local user");
                scans.update_scan_with_user(scan_id, scan_id).await;
            }
        }

        accepted
    }

    /// The record to show, `None` for the "not found" state.
    pub async fn resolve_record(
        &self,
        query: &PassportQuery,
        client: &ClientState,
    ) -> Result<Option<ItemTrace>, ServiceError> {
        if query.has_orphan_serial() {
            warn!("Unauthenticated code detected: serial provided without GTIN");
            return Err(ServiceError::AuthenticationRequired);
        }

        if let (Some(local_user), Some(scan_id), Some(scans)) =
            (client.returning_user(), query.scan_id.as_deref(), self.scans.as_ref())
        {
            info!(local_user, scan_id, "Returning user detected");
            scans.update_scan_with_user(scan_id, local_user).await;
        }

        if query.preview || !query.has_api_params() {
            return match self.preview.load().await {
                Some(record) => {
                    if !query.preview {
                        warn!(
                            "No item trace parameters provided, falling back to preview data; \
                             add ?preview=true to enable preview mode explicitly"
                        );
                    }
                    Ok(Some(record))
                }
                None if query.preview => Err(ServiceError::PreviewNotFound(
                    self.preview.path().display().to_string(),
                )),
                None => {
                    warn!("No item trace parameters provided and preview data not available");
                    Ok(None)
                }
            };
        }

        self.api.fetch(query).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductTranslation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubSource {
        record: ItemTrace,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordSource for StubSource {
        async fn fetch(&self, _query: &PassportQuery) -> Result<ItemTrace, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    #[derive(Default)]
    struct RecordingScans {
        updates: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ScanRecorder for RecordingScans {
        async fn update_scan_with_user(&self, scan_id: &str, client_id: &str) {
            self.updates
                .lock()
                .unwrap()
                .push((scan_id.to_string(), client_id.to_string()));
        }
    }

    fn stub(serial: &str) -> Arc<StubSource> {
        Arc::new(StubSource {
            record: ItemTrace {
                serial: Some(serial.to_string()),
                ..Default::default()
            },
            calls: AtomicUsize::new(0),
        })
    }

    fn missing_preview() -> PreviewSource {
        PreviewSource::new("/nonexistent/preview.json")
    }

    // ==================== Client State Tests ====================

    #[test]
    fn returning_user_requires_consent_and_id() {
        assert_eq!(
            ClientState::new(Some("accepted"), Some("u-1")).returning_user(),
            Some("u-1")
        );
        assert_eq!(ClientState::new(Some("declined"), Some("u-1")).returning_user(), None);
        assert_eq!(ClientState::new(Some("accepted"), Some("")).returning_user(), None);
    }

    #[test]
    fn accepting_consent_adopts_scan_id_once() {
        let fresh = ClientState::default().accepted(Some("scan-1"));
        assert_eq!(fresh.returning_user(), Some("scan-1"));

        let known = ClientState::new(Some("declined"), Some("u-1")).accepted(Some("scan-2"));
        assert_eq!(known.returning_user(), Some("u-1"));

        let no_scan = ClientState::default().accepted(None);
        assert_eq!(no_scan.cookie_consent.as_deref(), Some("accepted"));
        assert_eq!(no_scan.local_user, None);

        let declined = fresh.declined();
        assert_eq!(declined.returning_user(), None);
        assert_eq!(declined.local_user.as_deref(), Some("scan-1"));
    }

    #[tokio::test]
    async fn first_consent_records_scan_as_its_own_client() {
        let scans = Arc::new(RecordingScans::default());
        let loader = PassportLoader::new(stub("S-1"), missing_preview())
            .with_scan_recorder(scans.clone());
        let query = PassportQuery::parse("scanid=scan-5");

        let client = loader.accept_consent(&query, &ClientState::default()).await;
        assert_eq!(client.local_user.as_deref(), Some("scan-5"));

        // a second acceptance keeps the stored id and sends nothing more
        loader.accept_consent(&query, &client).await;

        let updates = scans.updates.lock().unwrap();
        assert_eq!(*updates, vec![("scan-5".to_string(), "scan-5".to_string())]);
    }

    // ==================== Cache Tests ====================

    #[test]
    fn cache_recomputes_only_on_new_record_identity() {
        let mut cache = SnapshotCache::default();
        let record = Arc::new(ItemTrace::default());

        let first = cache.derive(&record);
        let second = cache.derive(&Arc::clone(&record));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.computations(), 1);

        let equal_but_new = Arc::new(ItemTrace::default());
        cache.derive(&equal_but_new);
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn language_change_invalidates_cache() {
        let record = Arc::new(ItemTrace {
            product_join_key: Some(Product {
                translations: vec![
                    ProductTranslation {
                        languages_code: Some("en-US".into()),
                        product_description: Some("Shirt".into()),
                        ..Default::default()
                    },
                    ProductTranslation {
                        languages_code: Some("fr-FR".into()),
                        product_description: Some("Chemise".into()),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut cache = SnapshotCache::default();
        assert_eq!(cache.derive(&record).product_description.as_deref(), Some("Shirt"));
        cache.set_language("fr-FR");
        assert_eq!(cache.derive(&record).product_description.as_deref(), Some("Chemise"));
        assert_eq!(cache.computations(), 2);
    }

    // ==================== Snapshot Tests ====================

    #[test]
    fn snapshot_states_are_exclusive() {
        assert_eq!(PassportSnapshot::loading().state(), LoadState::Loading);

        let failed = PassportSnapshot::failed(ErrorView::from_error(
            &ServiceError::AuthenticationRequired,
            None,
        ));
        assert_eq!(failed.state(), LoadState::Error);
        assert!(!failed.is_loading);

        let empty = SnapshotCache::default().snapshot(None);
        assert_eq!(empty.state(), LoadState::Loaded);
        assert!(empty.is_not_found());
        assert!(empty.children().is_empty());
    }

    #[test]
    fn snapshot_exposes_pass_through_fields() {
        let record = ItemTrace {
            serial: Some("S-1".into()),
            current_disposition: Some("active".into()),
            product_join_key: Some(Product {
                gtin: Some("09506000134352".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let snapshot = SnapshotCache::default().snapshot(Some(Arc::new(record)));
        assert_eq!(snapshot.serial(), Some("S-1"));
        assert_eq!(snapshot.gtin(), Some("09506000134352"));
        assert_eq!(snapshot.disposition(), Some("active"));
        assert_eq!(
            snapshot.location_details().unwrap().location_name.as_deref(),
            Some("Raw Gen Factory")
        );

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["record"]["serial"], "S-1");
        assert_eq!(json["issue_date"], "N/A");
    }

    // ==================== Loader Tests ====================

    #[tokio::test]
    async fn orphan_serial_fails_without_fetching() {
        let source = stub("S-1");
        let mut loader = PassportLoader::new(source.clone(), missing_preview());

        let snapshot = loader
            .load(&PassportQuery::new(None, Some("S-1")), &ClientState::default(), None)
            .await;

        assert_eq!(snapshot.state(), LoadState::Error);
        assert_eq!(
            snapshot.error.unwrap().message,
            "Cannot validate code: Authentication required"
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_params_without_preview_is_not_found() {
        let source = stub("S-1");
        let mut loader = PassportLoader::new(source.clone(), missing_preview());

        let snapshot = loader
            .load(&PassportQuery::default(), &ClientState::default(), None)
            .await;

        assert!(snapshot.is_not_found());
        assert!(snapshot.error.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn explicit_preview_without_document_is_an_error() {
        let mut loader = PassportLoader::new(stub("S-1"), missing_preview())
            .with_support_email(Some("support@example.com".into()));

        let query = PassportQuery::default().with_preview(true);
        let snapshot = loader.load(&query, &ClientState::default(), None).await;

        let error = snapshot.error.unwrap();
        assert_eq!(error.code, "preview_not_found");
        assert_eq!(error.support_email.as_deref(), Some("support@example.com"));
    }

    #[tokio::test]
    async fn api_params_fetch_from_source() {
        let source = stub("S-9");
        let mut loader = PassportLoader::new(source.clone(), missing_preview());

        let snapshot = loader
            .load(
                &PassportQuery::new(Some("0950"), Some("S-9")),
                &ClientState::default(),
                Some("fr-FR"),
            )
            .await;

        assert_eq!(snapshot.serial(), Some("S-9"));
        assert_eq!(loader.cache().derivers().language, "fr-FR");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn returning_user_updates_scan() {
        let scans = Arc::new(RecordingScans::default());
        let loader = PassportLoader::new(stub("S-1"), missing_preview())
            .with_scan_recorder(scans.clone());

        let query = PassportQuery::new(Some("0950"), Some("S-1")).with_scan_id("scan-7");
        loader
            .resolve_record(&query, &ClientState::new(Some("accepted"), Some("u-1")))
            .await
            .unwrap();
        loader
            .resolve_record(&query, &ClientState::new(None, Some("u-1")))
            .await
            .unwrap();

        let updates = scans.updates.lock().unwrap();
        assert_eq!(*updates, vec![("scan-7".to_string(), "u-1".to_string())]);
    }
}
