//! Configuration management for Civic Help.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config file (.civic/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The resulting `AppConfig` is built once at startup and handed by reference
//! to every component constructor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Generative providers the assistant can talk to.
pub const KNOWN_PROVIDERS: [&str; 2] = ["gemini", "ollama"];

/// Embedding providers the knowledge index can be built with.
pub const KNOWN_EMBEDDING_PROVIDERS: [&str; 2] = ["trigram", "ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .civic/ and the corpus)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generative provider ("gemini", "ollama")
    pub provider: String,

    /// Generative model identifier
    pub model: String,

    /// Environment variable holding the generative API key
    pub api_key_env: String,

    /// API key for the generative provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Custom endpoint for the generative provider
    pub endpoint: Option<String>,

    pub embedding: EmbeddingSettings,

    pub search: SearchSettings,

    pub retrieval: RetrievalSettings,

    pub answer: AnswerPolicy,

    pub domain: DomainSettings,

    /// Structured scheme corpus (relative paths resolve against the workspace)
    pub corpus_path: PathBuf,

    /// Extra free-text files or directories to index
    pub documents: Vec<PathBuf>,

    /// Whether web search may be used when local knowledge falls short
    pub fallback_enabled: bool,

    pub response_mode: ResponseMode,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON
    pub log_json: bool,
}

/// Embedding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name: "trigram" or "ollama"
    pub provider: String,

    /// Model identifier (required)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: String::new(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Web search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSettings {
    pub provider: String,

    /// Environment variable holding the search API key
    pub api_key_env: String,

    /// `search.apiKey` in the file; the environment variable wins when set
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub endpoint: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: "serpapi".to_string(),
            api_key_env: "SERPAPI_KEY".to_string(),
            api_key: None,
            endpoint: None,
        }
    }
}

/// Retrieval and free-text windowing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalSettings {
    /// Number of units returned per query
    pub top_k: usize,

    /// Drop units scoring below this cosine similarity (disabled when unset)
    pub min_similarity: Option<f32>,

    /// Target window size (characters) for free-text ingestion
    pub window_size: usize,

    /// Overlap (characters) between consecutive windows
    pub window_overlap: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_similarity: None,
            window_size: 800,
            window_overlap: 100,
        }
    }
}

/// Policy deciding when a generated answer is too weak to stand alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnswerPolicy {
    /// Answers whose trimmed length is below this are insufficient
    pub min_answer_length: usize,

    /// Case-insensitive substrings that mark an answer as insufficient
    pub hedging_phrases: Vec<String>,
}

impl Default for AnswerPolicy {
    fn default() -> Self {
        Self {
            min_answer_length: 50,
            hedging_phrases: vec!["i don't know".to_string(), "not sure".to_string()],
        }
    }
}

/// The assistant's declared knowledge domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainSettings {
    /// Human-readable domain name used in prompts and refusals
    pub name: String,

    /// Case-insensitive keywords marking a query as in-domain
    pub keywords: Vec<String>,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            name: "Karnataka government schemes".to_string(),
            keywords: [
                "scheme",
                "benefit",
                "eligibility",
                "Karnataka",
                "government",
                "Sanjeevini",
                "NRLM",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        }
    }
}

/// How verbose generated answers should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Concise,
    Detailed,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" => Ok(Self::Concise),
            "detailed" => Ok(Self::Detailed),
            other => Err(AppError::Config(format!(
                "Unknown response mode: {}. Supported: concise, detailed",
                other
            ))),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    generation: Option<GenerationSection>,
    embedding: Option<EmbeddingSettings>,
    search: Option<SearchSettings>,
    retrieval: Option<RetrievalSettings>,
    answer: Option<AnswerPolicy>,
    domain: Option<DomainSettings>,
    corpus_path: Option<PathBuf>,
    documents: Option<Vec<PathBuf>>,
    fallback_enabled: Option<bool>,
    response_mode: Option<ResponseMode>,
    workspace: Option<WorkspaceSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    api_key: Option<String>,
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            endpoint: None,
            embedding: EmbeddingSettings::default(),
            search: SearchSettings::default(),
            retrieval: RetrievalSettings::default(),
            answer: AnswerPolicy::default(),
            domain: DomainSettings::default(),
            corpus_path: PathBuf::from("data/schemes.txt"),
            documents: Vec::new(),
            fallback_enabled: true,
            response_mode: ResponseMode::Concise,
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `CIVIC_WORKSPACE`: Override workspace path
    /// - `CIVIC_CONFIG`: Path to config file
    /// - `CIVIC_PROVIDER` / `CIVIC_MODEL`: Generative provider and model
    /// - `CIVIC_API_KEY`: Generative API key (falls back to the variable named by `api_key_env`)
    /// - `EMBEDDING_MODEL_NAME`: Embedding model identifier
    /// - `CIVIC_EMBEDDING_PROVIDER`: Embedding provider
    /// - `SERPAPI_KEY` (or `search.apiKeyEnv`): Web search API key
    /// - `CIVIC_CORPUS`: Scheme corpus path
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// Call [`AppConfig::validate`] once CLI overrides are applied.
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], but an explicit workspace or config file
    /// (e.g. from CLI flags) wins over `CIVIC_WORKSPACE` / `CIVIC_CONFIG`.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace
            .or_else(|| std::env::var("CIVIC_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("CIVIC_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.civic_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        Ok(config.apply_env(|key| std::env::var(key).ok()))
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        if let Some(generation) = config_file.generation {
            if let Some(provider) = generation.provider {
                result.provider = provider;
            }
            if let Some(model) = generation.model {
                result.model = model;
            }
            if let Some(api_key_env) = generation.api_key_env {
                result.api_key_env = api_key_env;
            }
            if let Some(api_key) = generation.api_key {
                result.api_key = Some(api_key);
            }
            result.endpoint = generation.endpoint.or(result.endpoint);
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }
        if let Some(search) = config_file.search {
            result.search = search;
        }
        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }
        if let Some(answer) = config_file.answer {
            result.answer = answer;
        }
        if let Some(domain) = config_file.domain {
            result.domain = domain;
        }
        if let Some(corpus_path) = config_file.corpus_path {
            result.corpus_path = corpus_path;
        }
        if let Some(documents) = config_file.documents {
            result.documents = documents;
        }
        if let Some(fallback_enabled) = config_file.fallback_enabled {
            result.fallback_enabled = fallback_enabled;
        }
        if let Some(response_mode) = config_file.response_mode {
            result.response_mode = response_mode;
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply environment variables through `lookup`.
    fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("CIVIC_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("CIVIC_MODEL") {
            self.model = model;
        }

        let file_key = self.api_key.take();
        self.api_key = non_blank(lookup("CIVIC_API_KEY"))
            .or_else(|| non_blank(lookup(&self.api_key_env)))
            .or_else(|| non_blank(file_key));

        if let Some(model) = lookup("EMBEDDING_MODEL_NAME") {
            self.embedding.model = model;
        }

        if let Some(provider) = lookup("CIVIC_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }

        let file_key = self.search.api_key.take();
        self.search.api_key =
            non_blank(lookup(&self.search.api_key_env)).or_else(|| non_blank(file_key));

        if let Some(corpus) = lookup("CIVIC_CORPUS") {
            self.corpus_path = PathBuf::from(corpus);
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }

        self
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        corpus: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(corpus) = corpus {
            self.corpus_path = corpus;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Get the path to the .civic directory.
    pub fn civic_dir(&self) -> PathBuf {
        self.workspace.join(".civic")
    }

    /// Resolved path of the scheme corpus.
    pub fn corpus_file(&self) -> PathBuf {
        self.resolve(&self.corpus_path)
    }

    /// Resolved paths of the extra free-text documents.
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.documents.iter().map(|p| self.resolve(p)).collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Validate configuration. Any error here must stop the process.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if provider == "gemini" && self.api_key.is_none() {
            return Err(AppError::Config(format!(
                "API key not found. Set CIVIC_API_KEY or {}",
                self.api_key_env
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config(
                "Generative model identifier is not set".to_string(),
            ));
        }

        let embedding_provider = self.embedding.provider.trim().to_lowercase();
        if !KNOWN_EMBEDDING_PROVIDERS.contains(&embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.model.trim().is_empty() {
            return Err(AppError::Config(
                "EMBEDDING_MODEL_NAME is not set".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "retrieval.topK must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.window_overlap >= self.retrieval.window_size {
            return Err(AppError::Config(format!(
                "retrieval.windowOverlap ({}) must be smaller than retrieval.windowSize ({})",
                self.retrieval.window_overlap, self.retrieval.window_size
            )));
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
