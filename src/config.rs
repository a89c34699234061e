use thiserror::Error;

pub const BASE_URL_VAR: &str = "JIRA_URL";
pub const USER_VAR: &str = "JIRA_USER";
pub const API_TOKEN_VAR: &str = "JIRA_API_TOKEN";
pub const SERVICE_DESK_VAR: &str = "SERVICE_DESK_PROJECT_KEY";
pub const TRANSITIONS_VAR: &str = "DEFAULT_TRANSITIONS";
pub const COMPONENT_VAR: &str = "COMPONENT_NAME";
pub const BUILD_STATUS_VAR: &str = "BUILD_STATUS";

pub const DEFAULT_SERVICE_DESK_KEY: &str = "SD";
pub const DEFAULT_TRANSITIONS: &str = "Done,Closed";
pub const DEFAULT_COMPONENT_NAME: &str = "Création du composant JIRA";
pub const DEFAULT_BUILD_STATUS: &str = "Build";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JIRA_URL environment variable is required")]
    MissingBaseUrl,
    #[error("--client must not be blank")]
    BlankClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub api_token: String,
}

/// Knobs of the verification run that do not concern the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySettings {
    pub service_desk_project: String,
    /// Preferred transition names, matched case-insensitively in order of
    /// the transitions the service offers.
    pub transition_targets: Vec<String>,
    pub component_name: String,
    pub build_status: String,
}

impl Default for VerifySettings {
    fn default() -> Self {
        Self {
            service_desk_project: DEFAULT_SERVICE_DESK_KEY.into(),
            transition_targets: parse_transition_list(DEFAULT_TRANSITIONS),
            component_name: DEFAULT_COMPONENT_NAME.into(),
            build_status: DEFAULT_BUILD_STATUS.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub base_url: String,
    /// Sent only when both user and token are present.
    pub credentials: Option<Credentials>,
    pub settings: VerifySettings,
}

impl VerifyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_blank(BASE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .ok_or(ConfigError::MissingBaseUrl)?;

        let credentials = match (non_blank(USER_VAR), non_blank(API_TOKEN_VAR)) {
            (Some(user), Some(api_token)) => Some(Credentials { user, api_token }),
            _ => None,
        };

        let defaults = VerifySettings::default();
        let settings = VerifySettings {
            service_desk_project: non_blank(SERVICE_DESK_VAR)
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.service_desk_project),
            transition_targets: lookup(TRANSITIONS_VAR)
                .map(|raw| parse_transition_list(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.transition_targets),
            component_name: non_blank(COMPONENT_VAR).unwrap_or(defaults.component_name),
            build_status: non_blank(BUILD_STATUS_VAR).unwrap_or(defaults.build_status),
        };

        Ok(Self {
            base_url,
            credentials,
            settings,
        })
    }
}

/// Split a comma-separated list of transition names, dropping blanks.
pub fn parse_transition_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
