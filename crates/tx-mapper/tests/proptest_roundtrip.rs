use proptest::option;
use proptest::prelude::*;
use tx_core::{
    Check, Extract, HttpMethod, NamedValue, PropertyMap, Ref, RefMode, Section, SectionType,
    Session, SshConnection, Step, TargetType, Test, TestConfiguration, TestGroup, Uut,
};
use tx_mapper::{parse_configuration, parse_test, write_configuration, write_test};

fn id() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{0,7}"
}

fn text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,:/&<>\"'${}-]{0,16}"
}

fn inline_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9.&<>-]([A-Za-z0-9 .&<>-]{0,14}[A-Za-z0-9.&<>-])?"
}

fn property_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-w][A-Za-z0-9]{0,6}",
        "[A-Za-z0-9 _.:-]{0,8}",
        Just("property".to_string()),
        Just("xmlVersion".to_string()),
        Just("größe".to_string()),
    ]
}

fn property_map() -> impl Strategy<Value = PropertyMap> {
    prop::collection::vec((property_key(), inline_text()), 0..4)
        .prop_map(|entries| entries.into_iter().collect())
}

fn target_type() -> impl Strategy<Value = TargetType> {
    prop::sample::select(TargetType::ALL.to_vec())
}

fn extract() -> impl Strategy<Value = Extract> {
    (
        id(),
        text(),
        option::of(id()),
        prop::collection::vec((id(), text()), 0..3),
    )
        .prop_map(|(name, pattern, options, checks)| Extract {
            name,
            pattern,
            options,
            checks: checks
                .into_iter()
                .map(|(source_ref, expect)| Check { source_ref, expect })
                .collect(),
        })
}

fn step() -> impl Strategy<Value = Step> {
    (
        (
            id(),
            option::of(id()),
            option::of(id()),
            option::of(target_type()),
            option::of(any::<i64>()),
            option::of(prop::sample::select(HttpMethod::ALL.to_vec())),
            option::of(text()),
        ),
        property_map(),
        property_map(),
        prop::collection::vec(extract(), 0..3),
        property_map(),
    )
        .prop_map(
            |((id, alias, target, target_type, timeout, method, command), params, headers, extracts, interaction)| Step {
                id,
                alias,
                target,
                target_type,
                timeout,
                method,
                command,
                params,
                headers,
                extracts,
                interaction,
            },
        )
}

fn session() -> impl Strategy<Value = Session> {
    (
        id(),
        target_type(),
        option::of(text()),
        option::of(any::<u16>()),
        option::of(text()),
        option::of(id()),
    )
        .prop_map(|(name, session_type, host, port, base_url, user)| Session {
            host,
            port,
            base_url,
            user,
            ..Session::new(name, session_type)
        })
}

fn section() -> impl Strategy<Value = Section> {
    (
        (
            id(),
            option::of(id()),
            option::of(text()),
            option::of(prop::sample::select(SectionType::ALL.to_vec())),
            option::of(any::<bool>()),
            option::of(any::<u32>()),
        ),
        (option::of(id()), option::of(id()), option::of(id())),
        prop::collection::vec(step(), 0..2),
        prop::collection::vec(
            (id(), option::of(prop::sample::select(vec![RefMode::Id, RefMode::Alias]))),
            0..3,
        ),
    )
        .prop_map(
            |((id, alias, name, section_type, fail_continue, retry_count), (retest_point, pass_next, fail_next), steps, refs)| Section {
                id,
                alias,
                name,
                section_type,
                fail_continue,
                retry_count,
                retest_point,
                pass_next,
                fail_next,
                steps,
                refs: refs.into_iter().map(|(step, mode)| Ref { step, mode }).collect(),
            },
        )
}

fn test_document() -> impl Strategy<Value = Test> {
    (
        (
            id(),
            option::of(id()),
            option::of(Just("http://sms.test/schema/1.0".to_string())),
            property_map(),
            option::of(inline_text()),
            option::of(any::<i32>()),
        ),
        prop::collection::vec(session(), 0..3),
        (property_map(), property_map()),
        prop::collection::vec(step(), 0..4),
        prop::collection::vec((id(), property_map()), 0..2),
        prop::collection::vec(section(), 0..3),
    )
        .prop_map(
            |((id, alias, namespace, meta, description, display_order), sessions, (config, functions), steps, groups, sections)| Test {
                id,
                alias,
                namespace,
                meta,
                description,
                display_order,
                sessions,
                config,
                functions,
                steps,
                test_groups: groups
                    .into_iter()
                    .map(|(name, properties)| TestGroup { name, properties })
                    .collect(),
                sections,
            },
        )
}

fn configuration() -> impl Strategy<Value = TestConfiguration> {
    (
        option::of(inline_text()),
        prop::collection::vec((id(), text(), any::<u16>(), option::of(id())), 0..3),
        prop::collection::vec((id(), text(), option::of(id())), 0..3),
        option::of(property_map()),
    )
        .prop_map(|(log_directory, ssh, variables, uut)| TestConfiguration {
            log_directory,
            uut: uut.map(|properties| Uut { properties }),
            ssh_list: ssh
                .into_iter()
                .map(|(name, host, port, user)| SshConnection {
                    port,
                    user,
                    ..SshConnection::new(name, host)
                })
                .collect(),
            variables: variables
                .into_iter()
                .map(|(name, value, value_type)| NamedValue {
                    name,
                    value,
                    value_type,
                })
                .collect(),
            ..TestConfiguration::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_documents_round_trip(test in test_document()) {
        let xml = write_test(&test);
        let parsed = parse_test(&xml).expect("written test should parse");
        prop_assert_eq!(&parsed, &test);
        prop_assert_eq!(write_test(&parsed), xml);
    }

    #[test]
    fn configurations_round_trip(config in configuration()) {
        let xml = write_configuration(&config);
        let parsed = parse_configuration(&xml).expect("written configuration should parse");
        prop_assert_eq!(parsed, config);
    }
}
