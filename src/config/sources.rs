//! YAML sources file: which providers to query and how to present results.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;

use crate::error::RequestListError;
use crate::filter::RepositoryFilter;
use crate::output::{DisplayZone, OutputFormat};
use crate::provider::AccessToken;
use crate::sort::SortKey;

/// One configured source: a hosting instance plus the repositories in scope.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Lower-cased provider discriminator (`gitlab`, `github`).
    pub api: String,
    /// Base URL of the hosting instance.
    pub host: String,
    /// Credential for the instance.
    pub token: AccessToken,
    /// Repositories whose requests are listed.
    pub repositories: RepositoryFilter,
}

/// Validated contents of the sources file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Sort applied to the merged listing; `None` keeps merge order.
    pub sort_by: Option<SortKey>,
    /// Output format.
    pub format: OutputFormat,
    /// Zone timestamps are displayed in.
    pub timezone: DisplayZone,
    /// Template file for [`OutputFormat::Template`].
    pub template: Option<Utf8PathBuf>,
    /// Sources in declaration order.
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sort_by: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default, alias = "Timezone")]
    timezone: Option<String>,
    #[serde(default)]
    template: Option<Utf8PathBuf>,
    #[serde(default)]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    api: String,
    host: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    repositories: Vec<String>,
}

impl Config {
    /// Reads the sources file at `path`.
    ///
    /// A relative `template` path is resolved against the directory holding
    /// the sources file.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Io`] when the file cannot be read and
    /// [`RequestListError::Configuration`] when its contents are invalid.
    pub fn from_path(path: &Utf8Path) -> Result<Self, RequestListError> {
        let contents = read_utf8(path, "sources file")?;
        let mut config = Self::from_yaml_str(&contents).map_err(|error| match error {
            RequestListError::Configuration { message } => {
                RequestListError::configuration(format!("{path}: {message}"))
            }
            other => other,
        })?;

        if let (Some(template), Some(base)) = (config.template.as_mut(), path.parent())
            && template.is_relative()
        {
            *template = base.join(&*template);
        }
        Ok(config)
    }

    /// Parses and validates YAML sources configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] for malformed YAML, an
    /// unknown sort key, format, or timezone, an invalid repository pattern,
    /// a source without an api, or the template format without a template.
    pub fn from_yaml_str(contents: &str) -> Result<Self, RequestListError> {
        let raw: RawConfig = serde_yaml::from_str(contents).map_err(|error| {
            RequestListError::configuration(format!("malformed sources file: {error}"))
        })?;

        let sort_by = raw
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::parse::<SortKey>)
            .transpose()?;
        let format = raw.format.as_deref().unwrap_or_default().parse::<OutputFormat>()?;
        let timezone = raw.timezone.as_deref().unwrap_or_default().parse::<DisplayZone>()?;
        if format == OutputFormat::Template && raw.template.is_none() {
            return Err(RequestListError::configuration(
                "format `template` requires a `template` path",
            ));
        }

        let sources = raw
            .sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| source.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sort_by,
            format,
            timezone,
            template: raw.template,
            sources,
        })
    }

    /// Reads the template file when the template format is selected.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Io`] when the template cannot be read.
    pub fn load_template(&self) -> Result<Option<String>, RequestListError> {
        if self.format != OutputFormat::Template {
            return Ok(None);
        }
        self.template
            .as_deref()
            .map(|path| read_utf8(path, "template"))
            .transpose()
    }
}

/// Reads a whole file through a capability handle on its parent directory.
fn read_utf8(path: &Utf8Path, label: &str) -> Result<String, RequestListError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| RequestListError::Io {
        message: format!("invalid {label} path {path}: no file name"),
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        RequestListError::Io {
            message: format!("failed to open {label} directory {parent}: {error}"),
        }
    })?;
    dir.read_to_string(file_name)
        .map_err(|error| RequestListError::Io {
            message: format!("failed to read {label} {path}: {error}"),
        })
}

impl RawSource {
    fn validate(self, index: usize) -> Result<SourceConfig, RequestListError> {
        let api = self.api.trim().to_lowercase();
        if api.is_empty() {
            return Err(RequestListError::configuration(format!(
                "source {position} has no api",
                position = index + 1
            )));
        }

        Ok(SourceConfig {
            api,
            host: self.host.trim().to_owned(),
            token: AccessToken::new(self.token.as_deref()),
            repositories: RepositoryFilter::from_patterns(&self.repositories)?,
        })
    }
}
