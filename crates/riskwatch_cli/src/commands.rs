use crate::cli::{Cli, Commands, ReportArgs, ValidateArgs};
use anyhow::Context;
use riskwatch_dataframe::{ContractLoader, CsvLoader, SchemaContract};
use riskwatch_drift::monitor_drift_from_files;
use riskwatch_settings::{DriftSettings, DriftSettingsOverlay};
use riskwatch_types::{DriftReport, ReportFuncs};
use tracing::info;

pub fn run(cli: Cli) -> Result<(), anyhow::Error> {
    match cli.command {
        Commands::Report(args) => report(&args).map(|_| ()),
        Commands::Validate(args) => validate(&args),
    }
}

/// Settings from the environment and the optional settings file, with
/// explicit flags applied last.
pub fn resolve_settings(args: &ReportArgs) -> Result<DriftSettings, anyhow::Error> {
    let settings = DriftSettings::load(args.config.as_deref())
        .with_context(|| "Failed to load drift settings")?;

    Ok(settings.merge(DriftSettingsOverlay {
        threshold: args.threshold,
        psi_bins: args.bins,
        binning_strategy: args.binning,
        strict: args.strict.then_some(true),
        report_path: args.output.clone(),
    }))
}

pub fn report(args: &ReportArgs) -> Result<DriftReport, anyhow::Error> {
    let settings = resolve_settings(args)?;
    let config = settings
        .to_drift_config()
        .with_context(|| "Invalid drift settings")?;

    let csv_loader = CsvLoader::new();

    let report = match &args.contract {
        Some(contract_path) => {
            let contract = SchemaContract::from_yaml_file(contract_path)
                .with_context(|| "Failed to load schema contract")?;
            monitor_drift_from_files(
                &ContractLoader::new(csv_loader, contract),
                &args.reference,
                &args.current,
                &settings.report_path,
                config,
            )
        }
        None => monitor_drift_from_files(
            &csv_loader,
            &args.reference,
            &args.current,
            &settings.report_path,
            config,
        ),
    }
    .with_context(|| "Failed to generate drift report")?;

    if args.print {
        println!("{}", ReportFuncs::__str__(&report));
    }

    Ok(report)
}

pub fn validate(args: &ValidateArgs) -> Result<(), anyhow::Error> {
    let contract = SchemaContract::from_yaml_file(&args.contract)
        .with_context(|| "Failed to load schema contract")?;

    let data = CsvLoader::new()
        .read(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    contract
        .validate(&data)
        .with_context(|| format!("{} violates its contract", args.data.display()))?;

    info!("{} satisfies its contract", args.data.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn csv_range(start: i32, end: i32) -> String {
        let mut content = String::from("age,node\n");
        for v in start..=end {
            content.push_str(&format!("{v},clinic_a\n"));
        }
        content
    }

    fn report_args(dir: &Path) -> ReportArgs {
        ReportArgs {
            reference: write(dir, "reference.csv", &csv_range(1, 10)),
            current: write(dir, "current.csv", &csv_range(101, 110)),
            output: Some(dir.join("out").join("report.json")),
            threshold: None,
            bins: Some(5),
            binning: None,
            strict: false,
            config: None,
            contract: None,
            print: false,
        }
    }

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = report_args(dir.path());
        args.config = Some(write(
            dir.path(),
            "settings.yaml",
            "threshold: 0.2\npsi_bins: 30\nbinning_strategy: quantile\n",
        ));

        let settings = resolve_settings(&args).unwrap();

        assert_eq!(settings.threshold, 0.2);
        assert_eq!(settings.psi_bins, 5);
        assert_eq!(settings.report_path, dir.path().join("out").join("report.json"));
    }

    #[test]
    fn test_report_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = report_args(dir.path());

        let report = report(&args).unwrap();
        assert!(report.overall_drift_detected);

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(args.output.as_ref().unwrap()).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["ks_test"]["drifted_feature_names"][0], "age");
        assert_eq!(saved["overall_drift_detected"], true);
    }

    #[test]
    fn test_report_with_violated_contract_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = report_args(dir.path());
        args.contract = Some(write(
            dir.path(),
            "contract.yaml",
            "fields:\n  - name: age\n    constraints:\n      max: 50\n",
        ));

        let err = report(&args).unwrap_err();
        assert!(format!("{err:#}").contains("age above max 50"));
        assert!(!args.output.as_ref().unwrap().exists());
    }

    #[test]
    fn test_validate_command() {
        let dir = tempfile::tempdir().unwrap();
        let data = write(dir.path(), "data.csv", &csv_range(1, 10));
        let contract = write(
            dir.path(),
            "contract.yaml",
            "fields:\n  - name: age\n    required: true\n  - name: node\n",
        );

        assert!(validate(&ValidateArgs {
            data: data.clone(),
            contract,
        })
        .is_ok());

        let strict_contract = write(
            dir.path(),
            "strict.yaml",
            "fields:\n  - name: age\n  - name: bmi\n",
        );
        let err = validate(&ValidateArgs {
            data,
            contract: strict_contract,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("missing columns: bmi"));
    }
}
