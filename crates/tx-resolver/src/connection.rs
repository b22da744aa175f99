use std::collections::BTreeSet;

use tx_core::{
    HttpConnection, Session, SshConnection, Step, TargetType, TelnetConnection, Test,
    TestConfiguration, Uut,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetails {
    pub name: String,
    pub connection_type: TargetType,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub prompt: Option<String>,
}

impl ConnectionDetails {
    fn stub(name: &str, connection_type: TargetType) -> Self {
        Self {
            name: name.to_string(),
            connection_type,
            host: None,
            port: None,
            base_url: None,
            user: None,
            password: None,
            prompt: None,
        }
    }

    fn from_uut(uut: &Uut, connection_type: TargetType) -> Self {
        Self {
            name: uut.name().unwrap_or_default().to_string(),
            connection_type,
            host: uut.host().map(str::to_string),
            port: uut.port(),
            base_url: None,
            user: uut.user().map(str::to_string),
            password: uut.password().map(str::to_string),
            prompt: uut.prompt().map(str::to_string),
        }
    }

    fn from_ssh(ssh: &SshConnection) -> Self {
        Self {
            host: Some(ssh.host.clone()),
            port: Some(ssh.port),
            user: ssh.user.clone(),
            password: ssh.password.clone(),
            prompt: Some(ssh.prompt.clone()),
            ..Self::stub(&ssh.name, TargetType::Ssh)
        }
    }

    fn from_telnet(telnet: &TelnetConnection) -> Self {
        Self {
            host: Some(telnet.host.clone()),
            port: Some(telnet.port),
            user: telnet.user.clone(),
            password: telnet.password.clone(),
            prompt: Some(telnet.prompt.clone()),
            ..Self::stub(&telnet.name, TargetType::Telnet)
        }
    }

    fn from_http(http: &HttpConnection) -> Self {
        Self {
            base_url: Some(http.base_url.clone()),
            user: http.user.clone(),
            password: http.password.clone(),
            ..Self::stub(&http.name, TargetType::Http)
        }
    }

    pub fn into_session(self) -> Session {
        Session {
            name: self.name,
            session_type: self.connection_type,
            host: self.host,
            port: self.port,
            base_url: self.base_url,
            user: self.user,
            password: self.password,
            prompt: self.prompt,
        }
    }
}

pub fn resolve_connection(step: &Step, config: &TestConfiguration) -> Option<ConnectionDetails> {
    let target = step.target.as_deref().filter(|target| !target.is_empty())?;
    let target_type = step.target_type?;

    let resolved = match target_type {
        TargetType::Ssh => uut_connection(config, target, TargetType::Ssh)
            .or_else(|| config.find_ssh(target).map(ConnectionDetails::from_ssh)),
        TargetType::Telnet => uut_connection(config, target, TargetType::Telnet)
            .or_else(|| config.find_telnet(target).map(ConnectionDetails::from_telnet)),
        TargetType::Http => config.find_http(target).map(ConnectionDetails::from_http),
        TargetType::Manual => Some(ConnectionDetails::stub(target, TargetType::Manual)),
    };

    tracing::trace!(
        step = %step.id,
        step_target = target,
        %target_type,
        resolved = resolved.is_some(),
        "resolved step connection"
    );
    resolved
}

fn uut_connection(
    config: &TestConfiguration,
    target: &str,
    target_type: TargetType,
) -> Option<ConnectionDetails> {
    config
        .uut_named(target)
        .filter(|uut| uut.declares_type(target_type))
        .map(|uut| ConnectionDetails::from_uut(uut, target_type))
}

pub fn collect_step_targets(test: &Test) -> Vec<String> {
    let mut seen = BTreeSet::new();
    test.all_steps()
        .filter_map(|step| step.target.as_deref())
        .filter(|target| !target.is_empty() && seen.insert(*target))
        .map(str::to_string)
        .collect()
}

pub fn generate_session_mappings(test: &Test, config: &TestConfiguration) -> Vec<Session> {
    if !test.sessions.is_empty() {
        return test.sessions.clone();
    }

    let sessions: Vec<Session> = collect_step_targets(test)
        .iter()
        .filter_map(|target| session_from_target(target, config))
        .collect();
    tracing::debug!(
        test = %test.id,
        generated = sessions.len(),
        "generated session mappings"
    );
    sessions
}

fn session_from_target(target: &str, config: &TestConfiguration) -> Option<Session> {
    let details = config
        .find_ssh(target)
        .map(ConnectionDetails::from_ssh)
        .or_else(|| config.find_http(target).map(ConnectionDetails::from_http))
        .or_else(|| config.find_telnet(target).map(ConnectionDetails::from_telnet))
        .or_else(|| {
            config
                .uut_named(target)
                .map(|uut| ConnectionDetails::from_uut(uut, uut.target_type()))
        });
    if details.is_none() {
        tracing::trace!(step_target = target, "no connection matches step target");
    }
    details.map(ConnectionDetails::into_session)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetIssue {
    UnknownTarget {
        step_index: usize,
        step_id: String,
        target: String,
        expected: TargetType,
    },
    TypeMismatch {
        step_index: usize,
        step_id: String,
        target: String,
        expected: TargetType,
        found: TargetType,
    },
}

impl TargetIssue {
    pub fn step_index(&self) -> usize {
        match self {
            Self::UnknownTarget { step_index, .. } | Self::TypeMismatch { step_index, .. } => {
                *step_index
            }
        }
    }

    pub fn step_id(&self) -> &str {
        match self {
            Self::UnknownTarget { step_id, .. } | Self::TypeMismatch { step_id, .. } => step_id,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::UnknownTarget { target, .. } | Self::TypeMismatch { target, .. } => target,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::UnknownTarget {
                step_id, target, ..
            } => format!("Step '{step_id}' references unknown target '{target}'"),
            Self::TypeMismatch {
                step_id,
                target,
                expected,
                found,
                ..
            } => format!(
                "Step '{step_id}' target '{target}' type mismatch: expected {expected}, found {found}"
            ),
        }
    }

    pub fn suggested_fix(&self) -> String {
        match self {
            Self::UnknownTarget {
                target, expected, ..
            } => format!(
                "Declare a session named '{target}' or add a {expected} connection named '{target}' to TestConfiguration"
            ),
            Self::TypeMismatch {
                target,
                expected,
                found,
                ..
            } => format!(
                "Set targetType to '{}' or point the step at a {expected} connection instead of '{target}'",
                found.as_xml_str()
            ),
        }
    }
}

pub fn check_target_mappings(test: &Test, config: &TestConfiguration) -> Vec<TargetIssue> {
    let sessions = generate_session_mappings(test, config);
    let mut issues = Vec::new();

    for (step_index, step) in test.all_steps().enumerate() {
        let (Some(target), Some(expected)) = (step.target.as_deref(), step.target_type) else {
            continue;
        };
        if target.is_empty() {
            continue;
        }

        match sessions.iter().find(|session| session.name == target) {
            Some(session) if session.session_type != expected => {
                issues.push(TargetIssue::TypeMismatch {
                    step_index,
                    step_id: step.id.clone(),
                    target: target.to_string(),
                    expected,
                    found: session.session_type,
                })
            }
            Some(_) => {}
            None => issues.push(TargetIssue::UnknownTarget {
                step_index,
                step_id: step.id.clone(),
                target: target.to_string(),
                expected,
            }),
        }
    }

    tracing::debug!(test = %test.id, issues = issues.len(), "checked target mappings");
    issues
}
