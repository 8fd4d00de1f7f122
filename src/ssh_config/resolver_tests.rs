// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tests for host lookup: block selection, merging and expansion together

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use crate::ssh_config::context::{LocalContext, NameService};
    use crate::ssh_config::fqdn::AddressFamily;
    use crate::ssh_config::parser::parse;
    use crate::ssh_config::resolver::{find_host_config, merge_block};
    use crate::ssh_config::types::{ConfigBlock, SettingValue};
    use crate::ssh_config::SshConfig;

    #[derive(Debug)]
    struct StaticNames;

    impl NameService for StaticNames {
        fn canonical_names(&self, _host: &str, _family: AddressFamily) -> io::Result<Vec<String>> {
            Err(io::Error::other("no resolver in tests"))
        }

        fn local_fqdn(&self, hostname: &str) -> String {
            format!("{hostname}.test")
        }
    }

    fn context() -> LocalContext {
        LocalContext::new("tester", "/home/tester", "workstation", Arc::new(StaticNames))
    }

    fn scalar(value: &str) -> SettingValue {
        SettingValue::Scalar(value.to_string())
    }

    #[test]
    fn test_first_matching_block_wins() {
        let content = r#"
Host foo
    User alice
Host *
    User bob
"#;
        let blocks = parse(content).unwrap();
        let config = find_host_config(&blocks, "foo", &context());
        assert_eq!(config.scalar("user"), Some("alice"));

        let config = find_host_config(&blocks, "other", &context());
        assert_eq!(config.scalar("user"), Some("bob"));
    }

    #[test]
    fn test_identity_files_accumulate_across_blocks() {
        let content = r#"
Host foo
    IdentityFile ~/.ssh/id1
Host *
    IdentityFile ~/.ssh/id2
"#;
        let blocks = parse(content).unwrap();
        let config = find_host_config(&blocks, "foo", &context());
        assert_eq!(
            config.list("identityfile"),
            Some(
                &[
                    "/home/tester/.ssh/id1".to_string(),
                    "/home/tester/.ssh/id2".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn test_forwards_do_not_accumulate_across_blocks() {
        let content = r#"
Host foo
    LocalForward 8080 localhost:80
Host *
    LocalForward 9090 localhost:90
    RemoteForward 7000 localhost:7000
"#;
        let blocks = parse(content).unwrap();
        let config = find_host_config(&blocks, "foo", &context());
        assert_eq!(
            config.list("localforward"),
            Some(&["8080 localhost:80".to_string()][..])
        );
        assert_eq!(
            config.list("remoteforward"),
            Some(&["7000 localhost:7000".to_string()][..])
        );
    }

    #[test]
    fn test_negation_veto() {
        let content = r#"
Host !bar.example.com *.example.com
    User carol
"#;
        let blocks = parse(content).unwrap();
        let vetoed = find_host_config(&blocks, "bar.example.com", &context());
        assert!(!vetoed.contains_key("user"));

        let applied = find_host_config(&blocks, "baz.example.com", &context());
        assert_eq!(applied.scalar("user"), Some("carol"));
    }

    #[test]
    fn test_disabled_proxy_is_removed() {
        let content = r#"
Host x
    ProxyCommand none
Host *
    ProxyCommand ssh -W %h:%p bastion
"#;
        let blocks = parse(content).unwrap();
        let config = find_host_config(&blocks, "x", &context());
        assert!(!config.contains_key("proxycommand"));

        let config = find_host_config(&blocks, "y", &context());
        assert_eq!(config.scalar("proxycommand"), Some("ssh -W y:22 bastion"));
    }

    #[test]
    fn test_unmatched_host_yields_only_hostname() {
        let blocks = parse("Host db\n    User dba\n").unwrap();
        let config = find_host_config(&blocks, "myhost", &context());
        assert_eq!(config.len(), 1);
        assert_eq!(config.hostname(), "myhost");
    }

    #[test]
    fn test_global_settings_apply_everywhere() {
        let content = r#"
User everyone
Host special
    User someone
"#;
        let blocks = parse(content).unwrap();
        // The implicit block comes first, so it wins for single-valued keys
        let config = find_host_config(&blocks, "special", &context());
        assert_eq!(config.scalar("user"), Some("everyone"));
    }

    #[test]
    fn test_hostname_and_expansion_use_merged_values() {
        let content = r#"
Host web-*
    HostName %h.internal
    ControlPath ~/.ssh/cm/%r@%h:%p
    ControlMaster auto
Host *
    User deploy
    Port 2200
"#;
        let blocks = parse(content).unwrap();
        let config = find_host_config(&blocks, "web-1", &context());
        assert_eq!(config.hostname(), "web-1.internal");
        assert_eq!(
            config.scalar("controlpath"),
            Some("~/.ssh/cm/deploy@web-1.internal:2200")
        );
        assert_eq!(config.scalar("controlmaster"), Some("auto"));
        assert_eq!(config.scalar("port"), Some("2200"));
    }

    #[test]
    fn test_lookup_does_not_mutate_store() {
        let content = r#"
Host a
    IdentityFile ~/.ssh/a
Host *
    IdentityFile ~/.ssh/common
"#;
        let config = SshConfig::parse(content).unwrap();
        let before = config.clone();
        let context = context();
        let resolver = config.resolver(&context);

        let first = resolver.lookup("a");
        let second = resolver.lookup("a");
        assert_eq!(first, second);
        assert_eq!(config, before);
        assert_eq!(
            config.blocks()[2].get("identityfile"),
            Some(&SettingValue::List(vec!["~/.ssh/common".to_string()]))
        );
    }

    #[test]
    fn test_merge_block_copies_values() {
        let mut first = ConfigBlock::new(vec!["*".to_string()]);
        first.settings.insert("user".to_string(), scalar("one"));
        first.settings.insert(
            "identityfile".to_string(),
            SettingValue::List(vec!["k1".to_string()]),
        );
        let mut second = ConfigBlock::new(vec!["*".to_string()]);
        second.settings.insert("user".to_string(), scalar("two"));
        second.settings.insert(
            "identityfile".to_string(),
            SettingValue::List(vec!["k2".to_string()]),
        );

        let mut merged = std::collections::BTreeMap::new();
        merge_block(&mut merged, &first);
        merge_block(&mut merged, &second);

        assert_eq!(merged.get("user"), Some(&scalar("one")));
        assert_eq!(
            merged.get("identityfile"),
            Some(&SettingValue::List(vec!["k1".to_string(), "k2".to_string()]))
        );
        assert_eq!(
            first.get("identityfile"),
            Some(&SettingValue::List(vec!["k1".to_string()]))
        );
    }

    #[test]
    fn test_resolver_hostnames() {
        let config = SshConfig::parse("Host foo\nHost *\n").unwrap();
        let context = context();
        let hostnames = config.resolver(&context).hostnames();
        assert_eq!(hostnames.len(), 2);
        assert!(hostnames.contains("foo"));
        assert!(hostnames.contains("*"));
    }
}
