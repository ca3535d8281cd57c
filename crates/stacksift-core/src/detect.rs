//! Detection orchestrator.
//!
//! [`Detector`] turns a repository's dependency manifests into a set of
//! catalog tool ids. For one repository every descriptor in
//! [`MANIFEST_DESCRIPTORS`] is fetched concurrently, each under its own
//! timeout. Found manifests are parsed, their identifiers combined, and the
//! combined list matched against the alias index.
//!
//! ## Failure handling
//!
//! | Fetch outcome | Effect |
//! |---------------|--------|
//! | `NotFound` | nothing (debug log) |
//! | `TimedOut` | nothing (debug log) |
//! | `Failed` | nothing (warn log) |
//! | `AuthError` | whole call fails with [`StackError::CredentialAuth`] |
//! | `RateLimited` | whole call fails with [`StackError::RateLimited`] |
//!
//! In-flight sibling fetches are allowed to finish and their results are
//! discarded when a terminal outcome is present.
//!
//! ## Bulk
//!
//! [`Detector::detect_many`] builds the index once, then walks the
//! repositories in fixed-size batches. Batches run strictly one after the
//! other; repositories within a batch run fully concurrently. Per-repository
//! errors are recorded in the [`BulkReport`] and never abort the run.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use crate::alias_index::AliasIndex;
use crate::catalog::{CatalogCache, ToolId};
use crate::config::{DetectionConfig, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_TIMEOUT_MS};
use crate::errors::StackError;
use crate::host::{Credential, FetchOutcome, RepoHost, RepoRef};
use crate::manifest::{ManifestDescriptor, MANIFEST_DESCRIPTORS};

// ============================================================================
// Options
// ============================================================================

/// Tuning for a [`Detector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectOptions {
    /// Timeout applied to each manifest fetch independently.
    pub fetch_timeout: Duration,
    /// Repositories detected concurrently per bulk batch.
    pub batch_size: usize,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl DetectOptions {
    /// Options for bulk and opportunistic detection.
    pub fn bulk(config: &DetectionConfig) -> Self {
        Self {
            fetch_timeout: config.fetch_timeout(),
            batch_size: config.batch_size,
        }
    }

    /// Options for interactive single-repository analysis (longer timeout).
    pub fn interactive(config: &DetectionConfig) -> Self {
        Self {
            fetch_timeout: config.interactive_timeout(),
            batch_size: config.batch_size,
        }
    }

    /// Override the per-fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Override the bulk batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// Tools detected for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Repository analysed.
    pub repo: RepoRef,
    /// Matched catalog tools. Empty is a valid outcome.
    pub tool_ids: BTreeSet<ToolId>,
    /// Manifest paths that were found and parsed, in descriptor order.
    pub manifests: Vec<String>,
}

impl DetectionResult {
    /// Whether no tool was detected.
    pub fn is_empty(&self) -> bool {
        self.tool_ids.is_empty()
    }
}

/// Per-repository outcomes of a bulk run.
#[derive(Debug)]
pub struct BulkReport {
    /// Outcome per repository.
    pub entries: BTreeMap<RepoRef, Result<DetectionResult, StackError>>,
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
}

impl BulkReport {
    /// Number of repositories detected successfully.
    pub fn succeeded(&self) -> usize {
        self.entries.values().filter(|r| r.is_ok()).count()
    }

    /// Number of repositories whose detection failed.
    pub fn failed(&self) -> usize {
        self.entries.values().filter(|r| r.is_err()).count()
    }

    /// Outcome for one repository.
    pub fn get(&self, repo: &RepoRef) -> Option<&Result<DetectionResult, StackError>> {
        self.entries.get(repo)
    }

    /// Number of repositories in the report.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Detector
// ============================================================================

/// Detection service. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct Detector {
    host: Arc<dyn RepoHost>,
    catalog: Arc<CatalogCache>,
    options: DetectOptions,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("catalog", &self.catalog)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Detector {
    /// Create a detector over a host client and a catalog cache.
    pub fn new(host: Arc<dyn RepoHost>, catalog: Arc<CatalogCache>, options: DetectOptions) -> Self {
        Self {
            host,
            catalog,
            options,
        }
    }

    /// The options in effect.
    pub fn options(&self) -> DetectOptions {
        self.options
    }

    /// The catalog cache backing this detector.
    pub fn catalog(&self) -> &Arc<CatalogCache> {
        &self.catalog
    }

    /// Detect the tools used by one repository.
    ///
    /// # Errors
    ///
    /// - [`StackError::CatalogUnavailable`] if the catalog cannot be loaded
    /// - [`StackError::CredentialAuth`] if the host rejects the credential
    /// - [`StackError::RateLimited`] if the credential's rate limit is exhausted
    pub async fn detect(
        &self,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<DetectionResult, StackError> {
        let index = self.catalog.index().await?;
        self.detect_with_index(&index, repo, credential).await
    }

    /// Detect against an already built index.
    pub async fn detect_with_index(
        &self,
        index: &AliasIndex,
        repo: &RepoRef,
        credential: &Credential,
    ) -> Result<DetectionResult, StackError> {
        let fetches = MANIFEST_DESCRIPTORS
            .iter()
            .map(|descriptor| self.fetch_manifest(repo, descriptor, credential));
        let outcomes = join_all(fetches).await;

        let mut identifiers: Vec<String> = Vec::new();
        let mut manifests = Vec::new();
        let mut terminal: Option<StackError> = None;

        for (descriptor, outcome) in MANIFEST_DESCRIPTORS.iter().zip(outcomes) {
            match outcome {
                FetchOutcome::Found(bytes) => {
                    let names = descriptor.parser.parse(&bytes);
                    tracing::debug!(
                        repo = %repo,
                        path = descriptor.path,
                        ecosystem = descriptor.ecosystem.tag(),
                        identifiers = names.len(),
                        "Parsed manifest"
                    );
                    manifests.push(descriptor.path.to_string());
                    identifiers.extend(names);
                }
                FetchOutcome::NotFound | FetchOutcome::TimedOut => {
                    tracing::debug!(
                        repo = %repo,
                        path = descriptor.path,
                        outcome = outcome.label(),
                        "Manifest skipped"
                    );
                }
                FetchOutcome::Failed(reason) => {
                    tracing::warn!(
                        repo = %repo,
                        path = descriptor.path,
                        "Manifest fetch failed: {}",
                        reason
                    );
                }
                FetchOutcome::AuthError(reason) => {
                    // A rejected credential outranks a rate limit.
                    if !matches!(terminal, Some(StackError::CredentialAuth { .. })) {
                        terminal = Some(StackError::CredentialAuth {
                            repo: repo.to_string(),
                            reason,
                        });
                    }
                }
                FetchOutcome::RateLimited { reset } => {
                    if terminal.is_none() {
                        terminal = Some(StackError::RateLimited {
                            repo: repo.to_string(),
                            reset,
                        });
                    }
                }
            }
        }

        if let Some(err) = terminal {
            tracing::warn!(repo = %repo, "Detection aborted: {}", err);
            return Err(err);
        }

        let tool_ids = index.match_packages(&identifiers);
        tracing::info!(
            repo = %repo,
            manifests = manifests.len(),
            identifiers = identifiers.len(),
            tools = tool_ids.len(),
            "Detection complete"
        );

        Ok(DetectionResult {
            repo: repo.clone(),
            tool_ids,
            manifests,
        })
    }

    /// Detect many repositories in sequential batches.
    ///
    /// # Errors
    ///
    /// Only [`StackError::CatalogUnavailable`] is returned directly; every
    /// other failure is recorded against its repository in the report.
    pub async fn detect_many(
        &self,
        repos: &[RepoRef],
        credential: &Credential,
    ) -> Result<BulkReport, StackError> {
        let index = self.catalog.index().await?;
        let batch_size = self.options.batch_size.max(1);
        let mut entries = BTreeMap::new();

        for (batch_no, batch) in repos.chunks(batch_size).enumerate() {
            let results = join_all(
                batch
                    .iter()
                    .map(|repo| self.detect_with_index(&index, repo, credential)),
            )
            .await;

            let mut failures = 0usize;
            for (repo, result) in batch.iter().zip(results) {
                if let Err(err) = &result {
                    failures += 1;
                    tracing::debug!(repo = %repo, "Recorded failure: {}", err);
                }
                entries.insert(repo.clone(), result);
            }

            tracing::info!(
                batch = batch_no + 1,
                repos = batch.len(),
                failures,
                "Bulk batch finished"
            );
        }

        let report = BulkReport {
            entries,
            generated_at: Utc::now(),
        };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Bulk detection finished"
        );
        Ok(report)
    }

    async fn fetch_manifest(
        &self,
        repo: &RepoRef,
        descriptor: &ManifestDescriptor,
        credential: &Credential,
    ) -> FetchOutcome {
        let fetch = self.host.fetch_file(repo, descriptor.path, credential);
        match tokio::time::timeout(self.options.fetch_timeout, fetch).await {
            Ok(outcome) => outcome,
            Err(_) => FetchOutcome::TimedOut,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSource, StaticCatalog, ToolCategory, ToolRecord};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    enum Reply {
        Body(&'static str),
        Slow(Duration, &'static str),
        Auth,
        RateLimit,
        Fail,
    }

    /// In-memory host: `(repo, path) -> reply`; anything else is `NotFound`.
    #[derive(Default)]
    struct FakeHost {
        files: HashMap<(String, String), Reply>,
        calls: AtomicUsize,
    }

    impl FakeHost {
        fn with(mut self, repo: &str, path: &str, reply: Reply) -> Self {
            self.files.insert((repo.to_string(), path.to_string()), reply);
            self
        }
    }

    #[async_trait]
    impl RepoHost for FakeHost {
        async fn fetch_file(&self, repo: &RepoRef, path: &str, _: &Credential) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.files.get(&(repo.to_string(), path.to_string())) {
                None => FetchOutcome::NotFound,
                Some(Reply::Body(body)) => FetchOutcome::Found(body.as_bytes().to_vec()),
                Some(Reply::Slow(delay, body)) => {
                    tokio::time::sleep(*delay).await;
                    FetchOutcome::Found(body.as_bytes().to_vec())
                }
                Some(Reply::Auth) => FetchOutcome::AuthError("401 Bad credentials".to_string()),
                Some(Reply::RateLimit) => FetchOutcome::RateLimited { reset: Some(42) },
                Some(Reply::Fail) => FetchOutcome::Failed("500 Internal Server Error".to_string()),
            }
        }

        async fn languages(
            &self,
            _: &RepoRef,
            _: &Credential,
        ) -> Result<HashMap<String, u64>, StackError> {
            Ok(HashMap::new())
        }
    }

    struct CountingCatalog {
        records: Vec<ToolRecord>,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for CountingCatalog {
        async fn list_tools(&self) -> Result<Vec<ToolRecord>, StackError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    struct DownCatalog;

    #[async_trait]
    impl CatalogSource for DownCatalog {
        async fn list_tools(&self) -> Result<Vec<ToolRecord>, StackError> {
            Err(StackError::CatalogUnavailable("database offline".to_string()))
        }
    }

    fn catalog() -> Vec<ToolRecord> {
        vec![
            ToolRecord::new("t1", "react", "React", ToolCategory::Frontend).with_aliases(["react"]),
            ToolRecord::new("t2", "express", "Express", ToolCategory::Backend)
                .with_aliases(["express"]),
            ToolRecord::new("t3", "go", "Go", ToolCategory::Language).with_aliases(["go"]),
            ToolRecord::new("t4", "flask", "Flask", ToolCategory::Backend).with_aliases(["flask"]),
            ToolRecord::new("t5", "gin", "Gin", ToolCategory::Backend)
                .with_aliases(["github.com/gin-gonic/gin"]),
        ]
    }

    fn detector(host: FakeHost) -> Detector {
        let cache = CatalogCache::new(Arc::new(StaticCatalog::new(catalog())));
        Detector::new(Arc::new(host), Arc::new(cache), DetectOptions::default())
    }

    fn ids(result: &DetectionResult) -> Vec<&str> {
        result.tool_ids.iter().map(|id| id.as_str()).collect()
    }

    fn cred() -> Credential {
        Credential::bearer("test-token")
    }

    #[tokio::test]
    async fn test_detect_package_json() {
        let host = FakeHost::default().with(
            "acme/web",
            "package.json",
            Reply::Body(r#"{"dependencies": {"react": "^18.0.0"}}"#),
        );
        let result = detector(host)
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap();

        assert_eq!(ids(&result), vec!["t1"]);
        assert_eq!(result.manifests, vec!["package.json"]);
    }

    #[tokio::test]
    async fn test_detect_combines_ecosystems() {
        let host = FakeHost::default()
            .with(
                "acme/mono",
                "package.json",
                Reply::Body(r#"{"devDependencies": {"express": "4"}}"#),
            )
            .with(
                "acme/mono",
                "requirements.txt",
                Reply::Body("# comment line\nflask==2.0.1\n\n"),
            );
        let result = detector(host)
            .detect(&RepoRef::new("acme", "mono"), &cred())
            .await
            .unwrap();

        assert_eq!(ids(&result), vec!["t2", "t4"]);
        assert_eq!(result.manifests, vec!["package.json", "requirements.txt"]);
    }

    #[tokio::test]
    async fn test_go_module_does_not_match_language_tool() {
        let host = FakeHost::default().with(
            "acme/svc",
            "go.mod",
            Reply::Body(
                "module example.com/svc\n\ngo 1.22\n\nrequire (\n\tgo-something v1.0.0\n\tgithub.com/gin-gonic/gin v1.9.1\n)\n",
            ),
        );
        let result = detector(host)
            .detect(&RepoRef::new("acme", "svc"), &cred())
            .await
            .unwrap();

        assert_eq!(ids(&result), vec!["t5"]);
    }

    #[tokio::test]
    async fn test_no_manifests_is_empty_not_error() {
        let host = FakeHost::default();
        let result = detector(host)
            .detect(&RepoRef::new("acme", "empty"), &cred())
            .await
            .unwrap();

        assert!(result.is_empty());
        assert!(result.manifests.is_empty());
    }

    #[tokio::test]
    async fn test_fetches_every_descriptor() {
        let host = Arc::new(FakeHost::default());
        let cache = CatalogCache::new(Arc::new(StaticCatalog::new(catalog())));
        let detector = Detector::new(host.clone(), Arc::new(cache), DetectOptions::default());

        detector
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap();
        assert_eq!(host.calls.load(Ordering::SeqCst), MANIFEST_DESCRIPTORS.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_does_not_block_other_manifests() {
        let host = FakeHost::default()
            .with(
                "acme/web",
                "package.json",
                Reply::Slow(Duration::from_secs(30), r#"{"dependencies": {"react": "18"}}"#),
            )
            .with("acme/web", "requirements.txt", Reply::Body("flask\n"));
        let result = detector(host)
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap();

        assert_eq!(ids(&result), vec!["t4"]);
        assert_eq!(result.manifests, vec!["requirements.txt"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_absorbed() {
        let host = FakeHost::default()
            .with("acme/web", "pom.xml", Reply::Fail)
            .with("acme/web", "Gemfile", Reply::Body("gem 'rails'\n"))
            .with(
                "acme/web",
                "package.json",
                Reply::Body(r#"{"dependencies": {"react": "18"}}"#),
            );
        let result = detector(host)
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap();

        assert_eq!(ids(&result), vec!["t1"]);
    }

    #[tokio::test]
    async fn test_auth_error_short_circuits() {
        let host = FakeHost::default()
            .with(
                "acme/web",
                "package.json",
                Reply::Body(r#"{"dependencies": {"react": "18"}}"#),
            )
            .with("acme/web", "go.mod", Reply::Auth);
        let err = detector(host)
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap_err();

        assert!(err.is_credential_error());
        assert!(err.to_string().contains("acme/web"));
    }

    #[tokio::test]
    async fn test_auth_error_outranks_rate_limit() {
        let host = FakeHost::default()
            .with("acme/web", "package.json", Reply::RateLimit)
            .with("acme/web", "Anchor.toml", Reply::Auth);
        let err = detector(host)
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap_err();

        assert!(err.is_credential_error());
    }

    #[tokio::test]
    async fn test_rate_limit_is_terminal() {
        let host = FakeHost::default().with("acme/web", "Cargo.toml", Reply::RateLimit);
        let err = detector(host)
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StackError::RateLimited {
                reset: Some(42),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_catalog_unavailable() {
        let cache = CatalogCache::new(Arc::new(DownCatalog));
        let detector = Detector::new(
            Arc::new(FakeHost::default()),
            Arc::new(cache),
            DetectOptions::default(),
        );

        let err = detector
            .detect(&RepoRef::new("acme", "web"), &cred())
            .await
            .unwrap_err();
        assert!(matches!(err, StackError::CatalogUnavailable(_)));

        let err = detector
            .detect_many(&[RepoRef::new("acme", "web")], &cred())
            .await
            .unwrap_err();
        assert!(matches!(err, StackError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn test_detect_is_deterministic() {
        let host = FakeHost::default()
            .with(
                "acme/web",
                "package.json",
                Reply::Body(r#"{"dependencies": {"react": "18", "express": "4"}}"#),
            )
            .with("acme/web", "requirements.txt", Reply::Body("flask\nFlask>=2\n"));
        let detector = detector(host);
        let repo = RepoRef::new("acme", "web");

        let first = detector.detect(&repo, &cred()).await.unwrap();
        for _ in 0..5 {
            assert_eq!(detector.detect(&repo, &cred()).await.unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_detect_many_records_per_repo_failures() {
        let repos: Vec<RepoRef> = (1..=15)
            .map(|i| RepoRef::new("acme", format!("repo-{:02}", i)))
            .collect();

        let mut host = FakeHost::default();
        for repo in &repos {
            host = host.with(
                &repo.to_string(),
                "package.json",
                Reply::Body(r#"{"dependencies": {"react": "18"}}"#),
            );
        }
        host = host.with("acme/repo-07", "go.mod", Reply::Auth);

        let source = Arc::new(CountingCatalog {
            records: catalog(),
            loads: AtomicUsize::new(0),
        });
        let detector = Detector::new(
            Arc::new(host),
            Arc::new(CatalogCache::new(source.clone())),
            DetectOptions::default().with_batch_size(4),
        );

        let report = detector.detect_many(&repos, &cred()).await.unwrap();

        assert_eq!(report.len(), 15);
        assert_eq!(report.succeeded(), 14);
        assert_eq!(report.failed(), 1);
        assert!(report
            .get(&RepoRef::new("acme", "repo-07"))
            .unwrap()
            .as_ref()
            .unwrap_err()
            .is_credential_error());
        for repo in repos.iter().filter(|r| r.name != "repo-07") {
            let result = report.get(repo).unwrap().as_ref().unwrap();
            assert_eq!(ids(result), vec!["t1"]);
        }
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    /// Host whose `package.json` fetch takes a per-repo delay and records
    /// when each repository starts and finishes it.
    struct InFlightHost {
        delays: HashMap<String, Duration>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        events: std::sync::Mutex<Vec<(String, bool)>>,
    }

    #[async_trait]
    impl RepoHost for InFlightHost {
        async fn fetch_file(&self, repo: &RepoRef, path: &str, _: &Credential) -> FetchOutcome {
            if path != "package.json" {
                return FetchOutcome::NotFound;
            }
            let Some(delay) = self.delays.get(&repo.to_string()) else {
                return FetchOutcome::NotFound;
            };
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.events.lock().unwrap().push((repo.to_string(), true));

            tokio::time::sleep(*delay).await;

            self.events.lock().unwrap().push((repo.to_string(), false));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            FetchOutcome::Found(br#"{"dependencies": {"react": "18"}}"#.to_vec())
        }

        async fn languages(
            &self,
            _: &RepoRef,
            _: &Credential,
        ) -> Result<HashMap<String, u64>, StackError> {
            Ok(HashMap::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_detect_many_waits_for_each_batch() {
        let repos: Vec<RepoRef> = (0..7)
            .map(|i| RepoRef::new("acme", format!("repo-{:02}", i)))
            .collect();
        // Uneven delays so a fast repo would free a slot early without batching.
        let delays = repos
            .iter()
            .enumerate()
            .map(|(i, repo)| (repo.to_string(), Duration::from_millis(40 * (i as u64 % 3 + 1))))
            .collect();
        let host = Arc::new(InFlightHost {
            delays,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            events: std::sync::Mutex::new(Vec::new()),
        });
        let cache = CatalogCache::new(Arc::new(StaticCatalog::new(catalog())));
        let detector = Detector::new(
            host.clone(),
            Arc::new(cache),
            DetectOptions::default().with_batch_size(3),
        );

        let report = detector.detect_many(&repos, &cred()).await.unwrap();
        assert_eq!(report.succeeded(), 7);
        assert_eq!(host.peak.load(Ordering::SeqCst), 3);
        assert_eq!(host.in_flight.load(Ordering::SeqCst), 0);

        let events = host.events.lock().unwrap();
        let position = |repo: &RepoRef, started: bool| {
            events
                .iter()
                .position(|(name, s)| *name == repo.to_string() && *s == started)
                .unwrap()
        };
        for pair in repos.chunks(3).collect::<Vec<_>>().windows(2) {
            let last_finish = pair[0].iter().map(|r| position(r, false)).max().unwrap();
            let first_start = pair[1].iter().map(|r| position(r, true)).min().unwrap();
            assert!(
                last_finish < first_start,
                "a later batch started before the previous one finished: {:?}",
                *events
            );
        }
    }

    #[tokio::test]
    async fn test_detect_many_empty_input() {
        let report = detector(FakeHost::default())
            .detect_many(&[], &cred())
            .await
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.succeeded(), 0);
    }

    #[test]
    fn test_options_from_config() {
        let config = DetectionConfig::default();
        assert_eq!(
            DetectOptions::bulk(&config).fetch_timeout,
            Duration::from_millis(500)
        );
        assert_eq!(
            DetectOptions::interactive(&config).fetch_timeout,
            Duration::from_millis(3_000)
        );
        assert_eq!(
            DetectOptions::default()
                .with_timeout(Duration::from_millis(5))
                .fetch_timeout,
            Duration::from_millis(5)
        );
    }
}
