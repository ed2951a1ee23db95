//! Update analysis for cluster configuration diffs.
//!
//! This library decides how a change in desired cluster configuration must be
//! carried out against the remote control plane. Key concepts:
//!
//! - **Replacement**: the change cannot be applied to the live cluster; a new
//!   cluster must be created under a new identifier.
//! - **In-place update**: the change maps onto one of the remote API's update
//!   calls (version upgrade, configuration update).
//! - **No-op**: nothing the remote API cares about changed.
//!
//! # Invariants
//!
//! - Analysis is pure and deterministic given the same inputs
//! - Replacement strictly dominates in-place updates
//! - Present-vs-absent is always a change, in either direction
//! - List comparison is order-sensitive (reordering is a change)

use kubeprov_events::ClusterConfig;

/// Which parts of the configuration changed between two snapshots.
///
/// Each flag is computed independently; use [`UpdateMap::plan`] to turn the
/// flags into a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateMap {
    /// `name` changed.
    pub replace_name: bool,

    /// `resourcesVpcConfig.subnetIds` or `resourcesVpcConfig.securityGroupIds` changed.
    pub replace_vpc: bool,

    /// `roleArn` changed.
    pub replace_role: bool,

    /// `version` changed.
    pub update_version: bool,

    /// `logging` changed.
    pub update_logging: bool,

    /// `resourcesVpcConfig.endpointPrivateAccess` or `endpointPublicAccess` changed.
    pub update_access: bool,
}

impl UpdateMap {
    /// Returns true if any change requires a new cluster.
    pub fn requires_replacement(&self) -> bool {
        self.replace_name || self.replace_vpc || self.replace_role
    }

    /// Returns true if the remote configuration-update call is needed.
    pub fn requires_config_update(&self) -> bool {
        self.update_logging || self.update_access
    }

    /// Reduce the flags to a single decision.
    pub fn plan(&self) -> UpdatePlan {
        if self.requires_replacement() {
            return UpdatePlan::Replace;
        }

        let updates = InPlaceUpdates {
            version: self.update_version,
            config: self.requires_config_update(),
        };

        if updates.is_empty() {
            UpdatePlan::NoOp
        } else {
            UpdatePlan::InPlace(updates)
        }
    }
}

impl std::fmt::Display for UpdateMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "replace_name={} replace_vpc={} replace_role={} update_version={} update_logging={} update_access={}",
            self.replace_name,
            self.replace_vpc,
            self.replace_role,
            self.update_version,
            self.update_logging,
            self.update_access
        )
    }
}

/// How an update event must be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePlan {
    /// Create a new cluster from the new configuration.
    Replace,

    /// Mutate the existing cluster.
    InPlace(InPlaceUpdates),

    /// Nothing to do.
    NoOp,
}

/// The in-place mutations an update needs, applied in field order.
///
/// The remote API rejects concurrent mutations on one cluster, so a version
/// update always runs to acceptance before the configuration update is issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InPlaceUpdates {
    /// Upgrade the Kubernetes version.
    pub version: bool,

    /// Replace the logging and endpoint access configuration.
    pub config: bool,
}

impl InPlaceUpdates {
    pub fn is_empty(&self) -> bool {
        !self.version && !self.config
    }
}

/// Compare two configuration snapshots.
pub fn analyze_update(old: &ClusterConfig, new: &ClusterConfig) -> UpdateMap {
    let old_vpc = old.vpc_config();
    let new_vpc = new.vpc_config();

    UpdateMap {
        replace_name: new.name != old.name,
        replace_vpc: new_vpc.subnet_ids != old_vpc.subnet_ids
            || new_vpc.security_group_ids != old_vpc.security_group_ids,
        replace_role: new.role_arn != old.role_arn,
        update_version: new.version != old.version,
        update_logging: new.logging != old.logging,
        update_access: new_vpc.endpoint_private_access != old_vpc.endpoint_private_access
            || new_vpc.endpoint_public_access != old_vpc.endpoint_public_access,
    }
}

/// Compare two configuration snapshots and decide how to apply the difference.
pub fn plan_update(old: &ClusterConfig, new: &ClusterConfig) -> UpdatePlan {
    analyze_update(old, new).plan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeprov_events::{LogSetup, LogType, Logging, VpcConfig};
    use proptest::prelude::*;
    use rstest::rstest;

    fn base_config() -> ClusterConfig {
        ClusterConfig {
            role_arn: Some("arn:of:role".to_string()),
            resources_vpc_config: Some(VpcConfig::new(
                ["subnet1", "subnet2"],
                ["sg1", "sg2", "sg3"],
            )),
            ..Default::default()
        }
    }

    fn audit_logging(enabled: bool) -> Logging {
        Logging {
            cluster_logging: Some(vec![LogSetup {
                types: Some(vec![LogType::Audit]),
                enabled: Some(enabled),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_configs_are_noop() {
        let config = base_config();
        assert_eq!(analyze_update(&config, &config), UpdateMap::default());
        assert_eq!(plan_update(&config, &config), UpdatePlan::NoOp);
    }

    #[rstest]
    #[case(None, Some("new-name-1234"))]
    #[case(Some("foo"), None)]
    #[case(Some("foo"), Some("bar"))]
    fn test_name_change_replaces(#[case] old_name: Option<&str>, #[case] new_name: Option<&str>) {
        let old = ClusterConfig {
            name: old_name.map(str::to_string),
            ..base_config()
        };
        let new = ClusterConfig {
            name: new_name.map(str::to_string),
            ..base_config()
        };

        let map = analyze_update(&old, &new);
        assert!(map.replace_name);
        assert_eq!(map.plan(), UpdatePlan::Replace);
    }

    #[rstest]
    #[case(VpcConfig::new(["subnet1", "subnet2"], ["sg1", "sg2", "sg3"]), false)]
    #[case(VpcConfig::new(["subnet1", "subnet2", "subnet3"], ["sg1", "sg2", "sg3"]), true)]
    #[case(VpcConfig::new(["subnet1"], ["sg1", "sg2", "sg3"]), true)]
    #[case(VpcConfig::new(["subnet1", "subnet2"], ["sg1", "sg2"]), true)]
    #[case(VpcConfig::new(["subnet1", "subnet2"], ["sg3", "sg2", "sg1"]), true)]
    #[case(VpcConfig::default(), true)]
    fn test_network_placement_change(#[case] new_vpc: VpcConfig, #[case] replaces: bool) {
        let new = ClusterConfig {
            resources_vpc_config: Some(new_vpc),
            ..base_config()
        };

        assert_eq!(analyze_update(&base_config(), &new).replace_vpc, replaces);
    }

    #[test]
    fn test_absent_and_empty_placement_are_equal() {
        let old = ClusterConfig::default();
        let new = ClusterConfig {
            resources_vpc_config: Some(VpcConfig::default()),
            ..Default::default()
        };

        let map = analyze_update(&old, &new);
        assert!(!map.replace_vpc);
        assert!(!map.update_access);
    }

    #[test]
    fn test_replacement_dominates_in_place() {
        let old = ClusterConfig {
            version: Some("1.0".to_string()),
            ..base_config()
        };
        let new = ClusterConfig {
            role_arn: Some("arn:of:new-role".to_string()),
            version: Some("1.1".to_string()),
            logging: Some(audit_logging(true)),
            ..base_config()
        };

        let map = analyze_update(&old, &new);
        assert!(map.replace_role);
        assert!(map.update_version);
        assert!(map.update_logging);
        assert_eq!(map.plan(), UpdatePlan::Replace);
    }

    #[rstest]
    #[case(None, Some("1.0"))]
    #[case(Some("1.0"), Some("1.1"))]
    #[case(Some("1.2"), None)]
    fn test_version_change_is_in_place(#[case] old: Option<&str>, #[case] new: Option<&str>) {
        let old = ClusterConfig {
            version: old.map(str::to_string),
            ..base_config()
        };
        let new = ClusterConfig {
            version: new.map(str::to_string),
            ..base_config()
        };

        assert_eq!(
            plan_update(&old, &new),
            UpdatePlan::InPlace(InPlaceUpdates {
                version: true,
                config: false,
            })
        );
    }

    #[test]
    fn test_same_version_is_noop() {
        let old = ClusterConfig {
            version: Some("1.0".to_string()),
            ..base_config()
        };
        let new = old.clone();

        assert_eq!(plan_update(&old, &new), UpdatePlan::NoOp);
    }

    #[test]
    fn test_logging_change_is_config_update() {
        let old = ClusterConfig {
            logging: Some(audit_logging(true)),
            ..base_config()
        };
        let new = ClusterConfig {
            logging: Some(audit_logging(false)),
            ..base_config()
        };

        let map = analyze_update(&old, &new);
        assert!(map.update_logging);
        assert!(!map.update_access);
        assert_eq!(
            map.plan(),
            UpdatePlan::InPlace(InPlaceUpdates {
                version: false,
                config: true,
            })
        );
    }

    #[test]
    fn test_unmodelled_logging_key_change_is_config_update() {
        let mut old_logging = audit_logging(true);
        old_logging
            .extra
            .insert("destination".to_string(), "central".into());
        let mut new_logging = old_logging.clone();
        new_logging
            .extra
            .insert("destination".to_string(), "regional".into());

        let old = ClusterConfig {
            logging: Some(old_logging),
            ..base_config()
        };
        let new = ClusterConfig {
            logging: Some(new_logging),
            ..base_config()
        };

        let map = analyze_update(&old, &new);
        assert!(map.update_logging);
        assert!(!map.requires_replacement());
    }

    #[test]
    fn test_unknown_log_type_change_is_config_update() {
        let old = ClusterConfig {
            logging: Some(audit_logging(true)),
            ..base_config()
        };
        let mut new_logging = audit_logging(true);
        if let Some(setups) = new_logging.cluster_logging.as_mut() {
            setups[0].types = Some(vec![LogType::Audit, LogType::Other("newType".to_string())]);
        }
        let new = ClusterConfig {
            logging: Some(new_logging),
            ..base_config()
        };

        assert!(analyze_update(&old, &new).update_logging);
    }

    #[test]
    fn test_endpoint_access_change_is_config_update() {
        let mut vpc = base_config().vpc_config();
        vpc.endpoint_public_access = Some(false);
        let new = ClusterConfig {
            resources_vpc_config: Some(vpc),
            ..base_config()
        };

        let map = analyze_update(&base_config(), &new);
        assert!(map.update_access);
        assert!(!map.replace_vpc);
        assert!(map.requires_config_update());
    }

    #[test]
    fn test_version_and_config_together() {
        let old = base_config();
        let new = ClusterConfig {
            version: Some("1.1".to_string()),
            logging: Some(audit_logging(true)),
            ..base_config()
        };

        assert_eq!(
            plan_update(&old, &new),
            UpdatePlan::InPlace(InPlaceUpdates {
                version: true,
                config: true,
            })
        );
    }

    fn arb_opt_string() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-z:]{1,12}")
    }

    proptest! {
        #[test]
        fn prop_role_change_iff_role_differs(old_role in arb_opt_string(), new_role in arb_opt_string()) {
            let old = ClusterConfig { role_arn: old_role.clone(), ..base_config() };
            let new = ClusterConfig { role_arn: new_role.clone(), ..base_config() };

            prop_assert_eq!(analyze_update(&old, &new).replace_role, old_role != new_role);
        }

        #[test]
        fn prop_reordered_subnets_replace(
            subnets in proptest::collection::btree_set("subnet-[0-9a-f]{4}", 2..6),
            rotation in 1usize..6,
        ) {
            let ordered: Vec<String> = subnets.into_iter().collect();
            let mut reordered = ordered.clone();
            reordered.rotate_left(rotation % ordered.len().max(1));
            prop_assume!(reordered != ordered);

            let old = ClusterConfig {
                resources_vpc_config: Some(VpcConfig::new(ordered, ["sg1"])),
                ..base_config()
            };
            let new = ClusterConfig {
                resources_vpc_config: Some(VpcConfig::new(reordered, ["sg1"])),
                ..base_config()
            };

            let map = analyze_update(&old, &new);
            prop_assert!(map.replace_vpc);
            prop_assert_eq!(map.plan(), UpdatePlan::Replace);
        }

        #[test]
        fn prop_analysis_is_symmetric(
            old_version in arb_opt_string(),
            new_version in arb_opt_string(),
            old_name in arb_opt_string(),
            new_name in arb_opt_string(),
        ) {
            let old = ClusterConfig { name: old_name, version: old_version, ..base_config() };
            let new = ClusterConfig { name: new_name, version: new_version, ..base_config() };

            prop_assert_eq!(analyze_update(&old, &new), analyze_update(&new, &old));
        }
    }
}
