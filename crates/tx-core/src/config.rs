use serde::{Deserialize, Serialize};

use crate::property::PropertyMap;
use crate::types::TargetType;

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_TELNET_PORT: u16 = 23;
pub const DEFAULT_SSH_PROMPT: &str = "$";
pub const DEFAULT_TELNET_PROMPT: &str = ">";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfiguration {
    pub namespace: Option<String>,
    pub uut: Option<Uut>,
    pub log_directory: Option<String>,
    pub ssh_list: Vec<SshConnection>,
    pub telnet_list: Vec<TelnetConnection>,
    pub http_list: Vec<HttpConnection>,
    pub variables: Vec<NamedValue>,
    pub constants: Vec<NamedValue>,
    pub inputs: Vec<NamedValue>,
}

impl TestConfiguration {
    pub fn find_ssh(&self, name: &str) -> Option<&SshConnection> {
        self.ssh_list.iter().find(|connection| connection.name == name)
    }

    pub fn find_telnet(&self, name: &str) -> Option<&TelnetConnection> {
        self.telnet_list
            .iter()
            .find(|connection| connection.name == name)
    }

    pub fn find_http(&self, name: &str) -> Option<&HttpConnection> {
        self.http_list.iter().find(|connection| connection.name == name)
    }

    pub fn uut_named(&self, name: &str) -> Option<&Uut> {
        self.uut.as_ref().filter(|uut| uut.name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Uut {
    pub properties: PropertyMap,
}

impl Uut {
    pub fn name(&self) -> Option<&str> {
        self.properties.get("Name")
    }

    pub fn uut_type(&self) -> Option<&str> {
        self.properties.get("Type")
    }

    pub fn target_type(&self) -> TargetType {
        self.uut_type()
            .and_then(TargetType::parse_xml)
            .unwrap_or(TargetType::Manual)
    }

    pub fn declares_type(&self, target_type: TargetType) -> bool {
        self.uut_type()
            .is_some_and(|raw| raw.trim().eq_ignore_ascii_case(target_type.as_xml_str()))
    }

    pub fn host(&self) -> Option<&str> {
        self.properties.get("Host")
    }

    pub fn port(&self) -> Option<u16> {
        self.properties
            .get("Port")
            .and_then(|raw| raw.trim().parse().ok())
    }

    pub fn user(&self) -> Option<&str> {
        self.properties.get("User")
    }

    pub fn password(&self) -> Option<&str> {
        self.properties.get("Password")
    }

    pub fn prompt(&self) -> Option<&str> {
        self.properties.get("Prompt")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshConnection {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub private_key_path: Option<String>,
    pub prompt: String,
}

impl SshConnection {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            user: None,
            password: None,
            private_key_path: None,
            prompt: DEFAULT_SSH_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelnetConnection {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub prompt: String,
}

impl TelnetConnection {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: DEFAULT_TELNET_PORT,
            user: None,
            password: None,
            prompt: DEFAULT_TELNET_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConnection {
    pub name: String,
    pub base_url: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u32>,
}

impl HttpConnection {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            user: None,
            password: None,
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedValue {
    pub name: String,
    pub value: String,
    pub value_type: Option<String>,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_type: None,
        }
    }
}
