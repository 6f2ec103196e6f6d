use clap::{
    Arg, ArgAction, Command, builder::PossibleValuesParser, crate_authors, crate_description,
    crate_name, crate_version,
};

fn subcommand_generate() -> Command {
    let mut args = vec![
        Arg::new("source")
            .long("source")
            .short('s')
            .required(true)
            .value_name("PATH")
            .help("YAML file holding the definitions of the webhooks to generate"),
        Arg::new("output-dir")
            .long("output-dir")
            .short('o')
            .required(true)
            .value_name("DIR")
            .help("Directory where the manifests are written. Created when missing"),
        Arg::new("webhook-version")
            .long("webhook-version")
            .action(ArgAction::Append)
            .number_of_values(1)
            .value_name("VERSION")
            .value_parser(PossibleValuesParser::new(["v1", "v1beta1"]))
            .default_value("v1")
            .help("admissionregistration.k8s.io version to generate manifests for. Can be repeated multiple times"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new("generate")
        .about("Generates the webhook configuration manifests of every requested version")
        .args(args)
}

fn subcommand_downgrade() -> Command {
    Command::new("downgrade")
        .about("Converts an admissionregistration.k8s.io/v1 webhook manifest to v1beta1")
        .arg(
            Arg::new("manifest")
                .required(true)
                .index(1)
                .value_name("PATH")
                .help("Manifest holding mutating and validating webhook configurations, one per document"),
        )
}

pub fn build_cli() -> Command {
    let mut subcommands = vec![subcommand_generate(), subcommand_downgrade()];
    subcommands.sort_by(|a, b| a.get_name().cmp(b.get_name()));

    Command::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Increase verbosity"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colorful output"),
        )
        .subcommands(subcommands)
        .subcommand_required(true)
        .arg_required_else_help(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        build_cli().debug_assert();
    }

    #[test]
    fn webhook_version_defaults_to_v1() {
        let matches = build_cli()
            .try_get_matches_from(["webhookgen", "generate", "-s", "webhooks.yaml", "-o", "out"])
            .unwrap();
        let (_, matches) = matches.subcommand().unwrap();

        let versions: Vec<&String> = matches.get_many::<String>("webhook-version").unwrap().collect();
        assert_eq!(vec!["v1"], versions);
    }

    #[test]
    fn webhook_version_can_be_repeated() {
        let matches = build_cli()
            .try_get_matches_from([
                "webhookgen",
                "generate",
                "--source",
                "webhooks.yaml",
                "--output-dir",
                "out",
                "--webhook-version",
                "v1",
                "--webhook-version",
                "v1beta1",
            ])
            .unwrap();
        let (_, matches) = matches.subcommand().unwrap();

        let versions: Vec<&String> = matches.get_many::<String>("webhook-version").unwrap().collect();
        assert_eq!(vec!["v1", "v1beta1"], versions);
    }

    #[test]
    fn unsupported_webhook_version_is_rejected() {
        let result = build_cli().try_get_matches_from([
            "webhookgen",
            "generate",
            "-s",
            "webhooks.yaml",
            "-o",
            "out",
            "--webhook-version",
            "v2",
        ]);
        assert!(result.is_err());
    }
}
