use crate::infra::{parse_source, source_map};
use clap::Args;
use gt_portal::config::{AppConfig, TelemetryConfig};
use gt_portal::error::AppError;
use gt_portal::images::{
    default_search_locations, DirectoryDiscovery, FsMaterializer, HeroImageOrganizer,
    LocationScanner, OrganizeOutcome, OrganizeReport, SlotCatalog, StaticFolders,
};
use gt_portal::telemetry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const RULE: &str = "======================================================================";

#[derive(Args, Debug, Default)]
pub(crate) struct OrganizeArgs {
    /// Project directory; search locations and the static root are resolved against it
    #[arg(long)]
    pub(crate) project_root: Option<PathBuf>,
    /// Use this folder for a source instead of searching (NAME=PATH, repeatable)
    #[arg(long = "source", value_parser = parse_source)]
    pub(crate) sources: Vec<(String, PathBuf)>,
    /// Extra directory to search for source folders (repeatable)
    #[arg(long = "search-dir")]
    pub(crate) search_dirs: Vec<PathBuf>,
    /// Where the hero files are written (defaults to <static>/images/paraiba)
    #[arg(long)]
    pub(crate) target_dir: Option<PathBuf>,
    /// JSON slot catalog replacing the built-in hero slots
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Seed the shuffle for a reproducible selection
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the report as JSON instead of the human summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Log every scoring and copy decision
    #[arg(long)]
    pub(crate) verbose: bool,
}

pub(crate) fn run_organize(args: OrganizeArgs) -> Result<(), AppError> {
    let OrganizeArgs {
        project_root,
        sources,
        search_dirs,
        target_dir,
        catalog,
        seed,
        json,
        verbose,
    } = args;

    let config = AppConfig::load()?;
    let log_level = if verbose {
        config.telemetry.log_level.clone()
    } else {
        "warn".to_string()
    };
    telemetry::init_stderr(&TelemetryConfig { log_level })?;

    let project_root = match project_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let target_dir = target_dir.unwrap_or_else(|| project_root.join(config.site.hero_path()));

    let catalog = match catalog {
        Some(path) => SlotCatalog::from_json_reader(BufReader::new(File::open(path)?))?,
        None => SlotCatalog::standard(),
    };

    let discovery: Box<dyn DirectoryDiscovery> = if sources.is_empty() {
        let mut locations = default_search_locations(&project_root);
        locations.extend(search_dirs);
        Box::new(LocationScanner::with_default_sources(locations))
    } else {
        Box::new(StaticFolders(source_map(sources)))
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let materializer = FsMaterializer::new(&target_dir);
    let organizer = HeroImageOrganizer::new(discovery.as_ref(), &materializer, &catalog);
    let outcome = organizer.run(&mut rng);

    if json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(body) => println!("{body}"),
            Err(err) => eprintln!("Report unavailable: {err}"),
        }
        return Ok(());
    }

    println!("{RULE}");
    println!("Organizador de imagens do MTur - GT-09");
    println!("{RULE}");

    match outcome {
        OrganizeOutcome::NoSourceFolders => {
            println!("\nNenhuma pasta 'paraiba' ou 'cabedelo' foi encontrada.");
            println!("\nVocê pode:");
            println!("1. Colocar as pastas na raiz do projeto");
            println!("2. Ou colocá-las na pasta Downloads");
            println!("3. Ou informar as pastas com --source nome=caminho");
        }
        OrganizeOutcome::NoImages { folders } => {
            println!("\nPastas encontradas:");
            for (name, path) in &folders {
                println!("  - {}: {}", name, path.display());
            }
            println!("\nNenhuma imagem (.jpg, .jpeg, .png) encontrada nas pastas.");
        }
        OrganizeOutcome::Organized(report) => {
            render_report(&report, &catalog, &target_dir);
        }
    }

    Ok(())
}

fn render_report(report: &OrganizeReport, catalog: &SlotCatalog, target_dir: &Path) {
    println!("\nPastas encontradas:");
    for (name, path) in &report.folders {
        let images = report.images_per_folder.get(name).copied().unwrap_or(0);
        println!("  - {}: {} ({} imagens)", name, path.display(), images);
    }

    println!("\n{RULE}");
    println!("Seleção por palavras-chave");
    println!("{RULE}");
    for (slot, outcome) in catalog.slots().iter().zip(&report.assignment.outcomes) {
        println!("\n{}", slot.target_name);
        if !slot.description.is_empty() {
            println!("   {}", slot.description);
        }
        match &outcome.candidate {
            Some(candidate) => println!(
                "   Selecionada: {} (de {}, pontuação {})",
                candidate.name,
                candidate.source,
                outcome.score.unwrap_or_default()
            ),
            None => println!("   Nenhuma imagem disponível (todas já foram usadas)"),
        }
    }

    println!("\n{RULE}");
    println!("Cópias para {}", target_dir.display());
    println!("{RULE}");
    for copy in &report.copied {
        println!("ok    {} <- {}", copy.slot, copy.source_name);
    }
    for failure in &report.failures {
        println!("erro  {} <- {}: {}", failure.slot, failure.source_name, failure.error);
    }

    println!("\n{RULE}");
    println!("Resumo");
    println!("{RULE}");
    for status in &report.slots {
        if status.present {
            println!("ok    {}", status.slot);
        } else {
            println!("falta {}", status.slot);
        }
    }

    let missing = report.missing();
    if missing.is_empty() {
        println!("\nTodas as imagens foram organizadas.");
        println!("As imagens estão em: {}", target_dir.display());
    } else {
        println!("\n{} imagem(ns) ainda faltando.", missing.len());
        println!("\nVocê pode:");
        println!("1. Executar o comando novamente com outras pastas de origem");
        println!("2. Copiar manualmente as imagens para {}", target_dir.display());
        println!("3. Renomear as imagens manualmente para os nomes esperados");
    }
}
