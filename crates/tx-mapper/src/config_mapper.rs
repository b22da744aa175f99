use tx_core::{
    HttpConnection, NamedValue, SshConnection, TelnetConnection, TestConfiguration,
    TestXmlError, Uut, DEFAULT_SSH_PORT, DEFAULT_SSH_PROMPT, DEFAULT_TELNET_PORT,
    DEFAULT_TELNET_PROMPT,
};
use tx_parser::{parse_xml_document, write_document, XmlElementNode};

use crate::xml_utils::{
    attr_or_empty, optional_attr, optional_attr_any, parse_number_attr, property_bag_element,
    read_property_bag, text_element,
};

pub const CONFIGURATION_ROOT: &str = "TestConfiguration";

const USER_ATTRS: [&str; 2] = ["User", "Username"];

pub fn parse_configuration(source: &str) -> Result<TestConfiguration, TestXmlError> {
    let document = parse_xml_document(source)?;
    configuration_from_element(&document.root)
}

pub fn write_configuration(config: &TestConfiguration) -> String {
    write_document(&configuration_to_element(config))
}

pub fn configuration_from_element(root: &XmlElementNode) -> Result<TestConfiguration, TestXmlError> {
    if root.name != CONFIGURATION_ROOT {
        return Err(TestXmlError::with_span(
            "XML_ROOT_MISMATCH",
            format!(
                "Expected root <{}>, found <{}>.",
                CONFIGURATION_ROOT, root.name
            ),
            root.location.clone(),
        ));
    }

    let mut config = TestConfiguration {
        namespace: root.namespace.clone(),
        ..TestConfiguration::default()
    };

    for child in root.element_children() {
        match child.name.as_str() {
            "UUT" => {
                config.uut = Some(Uut {
                    properties: read_property_bag(child),
                })
            }
            "LogDirectory" => config.log_directory = Some(child.text_content()),
            "SshList" => {
                for entry in entries(child, "SshConnection", "Ssh") {
                    config.ssh_list.push(map_ssh(entry)?);
                }
            }
            "TelnetList" => {
                for entry in entries(child, "TelnetConnection", "Telnet") {
                    config.telnet_list.push(map_telnet(entry)?);
                }
            }
            "HttpList" => {
                for entry in entries(child, "HttpConnection", "Http") {
                    config.http_list.push(map_http(entry)?);
                }
            }
            "Variables" => config.variables = map_named_values(child, "Variable"),
            "Constants" => config.constants = map_named_values(child, "Constant"),
            "Inputs" => config.inputs = map_named_values(child, "Input"),
            other => tracing::debug!(element = other, "ignoring unknown <TestConfiguration> child"),
        }
    }

    tracing::debug!(
        ssh = config.ssh_list.len(),
        telnet = config.telnet_list.len(),
        http = config.http_list.len(),
        has_uut = config.uut.is_some(),
        "mapped configuration document"
    );
    Ok(config)
}

fn entries<'a>(
    list: &'a XmlElementNode,
    long_name: &'a str,
    short_name: &'a str,
) -> impl Iterator<Item = &'a XmlElementNode> + 'a {
    list.element_children()
        .filter(move |entry| entry.name == long_name || entry.name == short_name)
}

fn map_ssh(node: &XmlElementNode) -> Result<SshConnection, TestXmlError> {
    Ok(SshConnection {
        name: attr_or_empty(node, "Name"),
        host: attr_or_empty(node, "Host"),
        port: parse_number_attr(node, "Port")?.unwrap_or(DEFAULT_SSH_PORT),
        user: optional_attr_any(node, &USER_ATTRS),
        password: optional_attr(node, "Password"),
        private_key_path: optional_attr(node, "PrivateKeyPath"),
        prompt: optional_attr(node, "Prompt").unwrap_or_else(|| DEFAULT_SSH_PROMPT.to_string()),
    })
}

fn map_telnet(node: &XmlElementNode) -> Result<TelnetConnection, TestXmlError> {
    Ok(TelnetConnection {
        name: attr_or_empty(node, "Name"),
        host: attr_or_empty(node, "Host"),
        port: parse_number_attr(node, "Port")?.unwrap_or(DEFAULT_TELNET_PORT),
        user: optional_attr_any(node, &USER_ATTRS),
        password: optional_attr(node, "Password"),
        prompt: optional_attr(node, "Prompt")
            .unwrap_or_else(|| DEFAULT_TELNET_PROMPT.to_string()),
    })
}

fn map_http(node: &XmlElementNode) -> Result<HttpConnection, TestXmlError> {
    Ok(HttpConnection {
        name: attr_or_empty(node, "Name"),
        base_url: attr_or_empty(node, "BaseUrl"),
        user: optional_attr_any(node, &USER_ATTRS),
        password: optional_attr(node, "Password"),
        timeout: parse_number_attr(node, "Timeout")?,
    })
}

fn map_named_values(list: &XmlElementNode, entry_name: &str) -> Vec<NamedValue> {
    list.children_named(entry_name)
        .map(|entry| NamedValue {
            name: attr_or_empty(entry, "Name"),
            value: attr_or_empty(entry, "Value"),
            value_type: optional_attr(entry, "Type"),
        })
        .collect()
}

pub fn configuration_to_element(config: &TestConfiguration) -> XmlElementNode {
    let mut root = XmlElementNode::new(CONFIGURATION_ROOT);
    root.namespace = config.namespace.clone();

    if let Some(uut) = &config.uut {
        root.push_element(property_bag_element("UUT", &uut.properties));
    }
    if let Some(log_directory) = &config.log_directory {
        root.push_element(text_element("LogDirectory", log_directory));
    }

    if !config.ssh_list.is_empty() {
        let mut list = XmlElementNode::new("SshList");
        for ssh in &config.ssh_list {
            list.push_element(
                XmlElementNode::new("SshConnection")
                    .with_attr("Name", ssh.name.as_str())
                    .with_attr("Host", ssh.host.as_str())
                    .with_attr("Port", ssh.port.to_string())
                    .with_optional_attr("User", ssh.user.as_deref())
                    .with_optional_attr("Password", ssh.password.as_deref())
                    .with_optional_attr("PrivateKeyPath", ssh.private_key_path.as_deref())
                    .with_attr("Prompt", ssh.prompt.as_str()),
            );
        }
        root.push_element(list);
    }

    if !config.telnet_list.is_empty() {
        let mut list = XmlElementNode::new("TelnetList");
        for telnet in &config.telnet_list {
            list.push_element(
                XmlElementNode::new("TelnetConnection")
                    .with_attr("Name", telnet.name.as_str())
                    .with_attr("Host", telnet.host.as_str())
                    .with_attr("Port", telnet.port.to_string())
                    .with_optional_attr("User", telnet.user.as_deref())
                    .with_optional_attr("Password", telnet.password.as_deref())
                    .with_attr("Prompt", telnet.prompt.as_str()),
            );
        }
        root.push_element(list);
    }

    if !config.http_list.is_empty() {
        let mut list = XmlElementNode::new("HttpList");
        for http in &config.http_list {
            list.push_element(
                XmlElementNode::new("HttpConnection")
                    .with_attr("Name", http.name.as_str())
                    .with_attr("BaseUrl", http.base_url.as_str())
                    .with_optional_attr("User", http.user.as_deref())
                    .with_optional_attr("Password", http.password.as_deref())
                    .with_optional_attr("Timeout", http.timeout.map(|timeout| timeout.to_string())),
            );
        }
        root.push_element(list);
    }

    for (list_name, entry_name, values) in [
        ("Variables", "Variable", &config.variables),
        ("Constants", "Constant", &config.constants),
        ("Inputs", "Input", &config.inputs),
    ] {
        if values.is_empty() {
            continue;
        }
        let mut list = XmlElementNode::new(list_name);
        for value in values {
            list.push_element(
                XmlElementNode::new(entry_name)
                    .with_attr("Name", value.name.as_str())
                    .with_attr("Value", value.value.as_str())
                    .with_optional_attr("Type", value.value_type.as_deref()),
            );
        }
        root.push_element(list);
    }

    root
}

#[cfg(test)]
mod config_mapper_tests {
    use super::*;

    const SAMPLE: &str = r#"<TestConfiguration xmlns="http://sms.test/config/1.0">
  <UUT>
    <Name>DUT</Name>
    <Type>ssh</Type>
    <Host>192.168.1.5</Host>
    <SerialNumber>SN-001</SerialNumber>
  </UUT>
  <LogDirectory>/var/log/tests</LogDirectory>
  <SshList>
    <SshConnection Name="DUT_SSH" Host="192.168.1.100" Port="22" Username="root" />
    <Ssh Name="BACKUP" Host="192.168.1.101" />
  </SshList>
  <TelnetList>
    <Telnet Name="CONSOLE" Host="192.168.1.200" />
  </TelnetList>
  <HttpList>
    <HttpConnection Name="API" BaseUrl="http://192.168.1.100:8080" Timeout="30" />
  </HttpList>
  <Variables>
    <Variable Name="RETRIES" Value="3" />
  </Variables>
  <Constants>
    <Constant Name="VERSION" Value="1.0" />
  </Constants>
  <Inputs>
    <Input Name="SERIAL" Value="ABC123" Type="string" />
  </Inputs>
</TestConfiguration>
"#;

    #[test]
    fn parse_configuration_reads_both_spellings_and_defaults() {
        let config = parse_configuration(SAMPLE).expect("configuration should map");
        assert_eq!(config.namespace.as_deref(), Some("http://sms.test/config/1.0"));
        assert_eq!(config.log_directory.as_deref(), Some("/var/log/tests"));

        let uut = config.uut.as_ref().expect("uut should be present");
        assert_eq!(uut.name(), Some("DUT"));
        assert_eq!(uut.properties.get("SerialNumber"), Some("SN-001"));

        assert_eq!(config.ssh_list.len(), 2);
        assert_eq!(config.ssh_list[0].user.as_deref(), Some("root"));
        assert_eq!(config.ssh_list[1].port, 22);
        assert_eq!(config.ssh_list[1].prompt, "$");
        assert_eq!(config.telnet_list[0].port, 23);
        assert_eq!(config.telnet_list[0].prompt, ">");
        assert_eq!(config.http_list[0].timeout, Some(30));
        assert_eq!(config.variables[0].value, "3");
        assert_eq!(config.constants[0].name, "VERSION");
        assert_eq!(config.inputs[0].value_type.as_deref(), Some("string"));
    }

    #[test]
    fn written_configuration_uses_long_names_and_maps_back() {
        let config = parse_configuration(SAMPLE).expect("configuration should map");
        let text = write_configuration(&config);
        assert!(text.contains(
            "<SshConnection Name=\"BACKUP\" Host=\"192.168.1.101\" Port=\"22\" Prompt=\"$\" />"
        ));
        assert!(text.contains("<TelnetConnection Name=\"CONSOLE\""));
        assert!(text.contains("User=\"root\""));
        assert!(!text.contains("Username"));

        let reparsed = parse_configuration(&text).expect("written configuration should map");
        assert_eq!(reparsed, config);
    }

    #[test]
    fn wrong_root_and_bad_port_are_rejected() {
        let error = parse_configuration("<test id=\"T\" />").expect_err("wrong root should fail");
        assert_eq!(error.code, "XML_ROOT_MISMATCH");

        let error = parse_configuration(
            r#"<TestConfiguration><SshList><Ssh Name="A" Host="h" Port="abc" /></SshList></TestConfiguration>"#,
        )
        .expect_err("bad port should fail");
        assert_eq!(error.code, "XML_ATTR_INVALID");
    }

    #[test]
    fn empty_configuration_writes_bare_root() {
        let text = write_configuration(&TestConfiguration::default());
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<TestConfiguration />\n"
        );
    }
}
