use crate::config::PlanConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a plan from a YAML file
pub fn load_config(config_path: &Path) -> Result<PlanConfig> {
    info!("Loading plan from: {:?}", config_path);

    // Open the plan file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open plan file '{}'", config_path.display()))?;

    // Parse the YAML content
    let config: PlanConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse plan file '{}'", config_path.display()))?;

    info!(
        "Plan: {} subnets in {} ({:?} on failure)",
        config.hosts.len(),
        config.base,
        config.on_failure
    );

    // Validate the plan
    config.validate()?;

    Ok(config)
}

/// Write a plan back out as YAML
pub fn save_config(config: &PlanConfig, config_path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(config).wrap_err("Failed to serialize plan")?;
    std::fs::write(config_path, yaml)
        .wrap_err_with(|| format!("Failed to write plan file '{}'", config_path.display()))?;
    info!("Plan saved to: {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vlsm::FailurePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_plan() {
        let yaml = r#"
base: 172.16.0.0/22
hosts: [200, 100, 50]
on_failure: skip_and_continue
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.hosts, vec![200, 100, 50]);
        assert_eq!(config.on_failure, FailurePolicy::SkipAndContinue);
    }

    #[test]
    fn test_load_rejects_invalid_plan() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "base: 10.0.0.0/8\nhosts: [0]\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config(Path::new("/nonexistent/plan.yaml")).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "base: 10.0.0.0/24\nhosts: [10]\n").unwrap();
        let config = load_config(temp_file.path()).unwrap();

        let out = NamedTempFile::new().unwrap();
        save_config(&config, out.path()).unwrap();
        assert_eq!(load_config(out.path()).unwrap(), config);
    }
}
