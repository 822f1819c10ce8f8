//! Migrate command - Copy an Azure DevOps project into a GitHub organization

use anyhow::{bail, Context};
use apodimo_azdo::AzureDevOpsClient;
use apodimo_core::{Config, GitMirror, MigrationReport, MigrationTarget, Migrator, Phase, Secrets};
use apodimo_github::GitHubClient;
use clap::{Args, ValueEnum};

/// Arguments for the migrate command
#[derive(Args)]
pub struct MigrateArgs {
    /// Azure DevOps project to migrate
    #[arg(long = "azdoProject", env = "AZURE_DEVOPS_PROJECT")]
    pub azdo_project: String,

    /// Azure DevOps personal access token
    #[arg(long = "azdoToken", env = "AZURE_DEVOPS_TOKEN", hide_env_values = true)]
    pub azdo_token: Option<String>,

    /// Azure DevOps organization URL, e.g. https://dev.azure.com/contoso
    #[arg(long = "azdoOrganizationUrl", env = "AZURE_DEVOPS_URL")]
    pub azdo_organization_url: String,

    /// Destination repository inside the GitHub organization
    #[arg(long = "gitHubProject")]
    pub github_project: String,

    /// GitHub token
    #[arg(long = "gitHubToken", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Destination GitHub organization
    #[arg(long = "gitHubOrganizationName")]
    pub github_organization: String,

    /// Phase to run (repeatable); all phases run when omitted
    #[arg(long = "phase", value_enum)]
    pub phases: Vec<PhaseArg>,

    /// Maximum concurrent tasks and API requests (overrides config and env)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Dry run - report what would be written without writing
    #[arg(long)]
    pub dry_run: bool,
}

impl std::fmt::Debug for MigrateArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrateArgs")
            .field("azdo_project", &self.azdo_project)
            .field("azdo_organization_url", &self.azdo_organization_url)
            .field("github_project", &self.github_project)
            .field("github_organization", &self.github_organization)
            .field("phases", &self.phases)
            .field("concurrency", &self.concurrency)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    Repositories,
    Boards,
    Iterations,
    WorkItems,
    TeamMembers,
    Wiki,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Repositories => Phase::Repositories,
            PhaseArg::Boards => Phase::Boards,
            PhaseArg::Iterations => Phase::Iterations,
            PhaseArg::WorkItems => Phase::WorkItems,
            PhaseArg::TeamMembers => Phase::TeamMembers,
            PhaseArg::Wiki => Phase::Wiki,
        }
    }
}

/// Selected phases in dependency order, each at most once
fn selected_phases(args: &[PhaseArg]) -> Vec<Phase> {
    if args.is_empty() {
        return Phase::ALL.to_vec();
    }

    let selected: Vec<Phase> = args.iter().copied().map(Phase::from).collect();
    Phase::ALL
        .into_iter()
        .filter(|phase| selected.contains(phase))
        .collect()
}

impl MigrateArgs {
    /// Execute the migrate command
    ///
    /// Fails when any entity of any phase failed, after printing the summary.
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let secrets = Secrets::load().context("Failed to load secrets")?;

        let azdo_token = secrets
            .azure_devops_token(self.azdo_token.clone())
            .context(
                "Azure DevOps token not found. Pass --azdoToken, set AZURE_DEVOPS_TOKEN \
                 or add [azure_devops] token to ~/.config/apodimo/secrets.toml",
            )?;
        let github_token = secrets.github_token(self.github_token.clone()).context(
            "GitHub token not found. Pass --gitHubToken, set GITHUB_TOKEN \
             or add [github] token to ~/.config/apodimo/secrets.toml",
        )?;

        let source = AzureDevOpsClient::builder(&self.azdo_organization_url, azdo_token.clone())
            .api_version(config.http.azure_devops_api_version.clone())
            .timeout(config.http.timeout)
            .build()?;
        let destination = GitHubClient::builder(github_token.clone())
            .api_url(config.http.github_api_url.clone())
            .timeout(config.http.timeout)
            .build()?;
        let mirror = GitMirror::new().with_temp_root(config.migration.temp_dir.clone());

        let phases = selected_phases(&self.phases);
        let target = MigrationTarget {
            source_project: self.azdo_project.clone(),
            organization: self.github_organization.clone(),
            repository: self.github_project.clone(),
            concurrency: config.migration.concurrency,
            dry_run: self.dry_run,
            source_token: Some(azdo_token),
            destination_token: Some(github_token),
        };

        tracing::info!(
            project = %target.source_project,
            organization = %target.organization,
            repository = %target.repository,
            phases = ?phases.iter().map(Phase::as_str).collect::<Vec<_>>(),
            concurrency = target.concurrency,
            dry_run = target.dry_run,
            "Starting migration"
        );

        let migrator = Migrator::new(&source, &destination, &mirror, target);
        let report = migrator.run(&phases).await;

        print_summary(&report, self.dry_run);

        let failed = report.failures().count();
        if failed > 0 {
            bail!("{} migration step(s) failed", failed);
        }
        Ok(())
    }
}

fn print_summary(report: &MigrationReport, dry_run: bool) {
    println!();
    if dry_run {
        println!("Migration Summary (dry run)");
        println!("===========================");
    } else {
        println!("Migration Summary");
        println!("=================");
    }
    for phase in &report.phases {
        println!("{}", phase);
    }

    if report.has_failures() {
        println!();
        println!("Failures:");
        for (phase, failure) in report.failures() {
            println!("  [{}] {}: {}", phase, failure.entity, failure.error);
        }
    }
}
