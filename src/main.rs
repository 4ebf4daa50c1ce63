use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use traitseq::genomics::io::read_sequence_file;
use traitseq::genomics::{
    render_vcf, AlignmentResult, AnalysisOutcome, AnalysisRecord, Analyzer, KnowledgeBase,
    MutationCall, Sequence, TraitSummary,
};
use traitseq::{align, AnalysisConfig};

#[derive(Parser, Debug)]
#[command(name = "traitseq", about = "Targeted SNP detection by global alignment")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Globally align a query against a reference.
    Align {
        /// Query sequence file (plain or FASTA).
        query: PathBuf,
        /// Reference sequence file (plain or FASTA).
        reference: PathBuf,
        /// Analysis configuration (JSON) supplying the scoring.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the (trait, gene) pairs available in the catalog.
    Traits {
        /// Variant catalog (JSON); defaults to the built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Look for a trait's catalogued variant in a sequence.
    Analyze {
        /// Sequence file (plain or FASTA).
        sequence: PathBuf,
        /// Trait to analyse, as listed by `traits`.
        #[arg(long = "trait")]
        trait_name: String,
        /// Gene carrying the trait's variant.
        #[arg(long)]
        gene: String,
        /// Variant catalog (JSON); defaults to the built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Analysis configuration (JSON).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the full report as JSON.
        #[arg(long, conflicts_with = "vcf")]
        json: bool,
        /// Print calls as VCF.
        #[arg(long)]
        vcf: bool,
    },
    /// Check that a sickle-cell substitution is detected with the built-in catalog.
    SelfTest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Align {
            query,
            reference,
            config,
        } => run_align(&query, &reference, config.as_deref())?,
        Commands::Traits { catalog } => run_traits(catalog.as_deref())?,
        Commands::Analyze {
            sequence,
            trait_name,
            gene,
            catalog,
            config,
            json,
            vcf,
        } => run_analyze(
            &sequence,
            &trait_name,
            &gene,
            catalog.as_deref(),
            config.as_deref(),
            OutputFormat::from_flags(json, vcf),
        )?,
        Commands::SelfTest => run_self_test()?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
    Vcf,
}

impl OutputFormat {
    fn from_flags(json: bool, vcf: bool) -> Self {
        match (json, vcf) {
            (true, _) => OutputFormat::Json,
            (_, true) => OutputFormat::Vcf,
            _ => OutputFormat::Text,
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<KnowledgeBase> {
    match path {
        Some(path) => KnowledgeBase::from_path(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => KnowledgeBase::builtin().context("built-in catalog is invalid"),
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_json_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_sequence(path: &Path) -> Result<Sequence> {
    let sequence = read_sequence_file(path)?;
    if sequence.is_empty() {
        bail!("no nucleotides found in {}", path.display());
    }
    Ok(sequence)
}

fn run_align(query_path: &Path, reference_path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let query = load_sequence(query_path)?;
    let reference = load_sequence(reference_path)?;

    let result = align(query.as_bytes(), reference.as_bytes(), &config.scoring);
    print_alignment(&result);
    println!("query:     {}", result.aligned_query);
    println!("reference: {}", result.aligned_reference);
    Ok(())
}

fn run_traits(catalog: Option<&Path>) -> Result<()> {
    let kb = load_catalog(catalog)?;
    for record in kb.available_traits() {
        println!(
            "{}\t{}\t{}\t{}>{}",
            record.trait_name, record.gene, record.rsid, record.reference_base, record.variant_base
        );
    }
    Ok(())
}

fn run_analyze(
    sequence_path: &Path,
    trait_name: &str,
    gene: &str,
    catalog: Option<&Path>,
    config: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let kb = Arc::new(load_catalog(catalog)?);
    let analyzer = Analyzer::new(kb, load_config(config)?).context("invalid configuration")?;
    let sequence = load_sequence(sequence_path)?;

    let outcome = analyzer
        .analyze(&sequence, trait_name, gene)
        .with_context(|| format!("analysis of {} failed", sequence_path.display()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome.report())?);
        }
        OutputFormat::Vcf => {
            print!("{}", render_vcf(&outcome.report().matches)?);
        }
        OutputFormat::Text => print_outcome(&analyzer, trait_name, gene, &sequence, &outcome),
    }
    Ok(())
}

fn run_self_test() -> Result<()> {
    const HBB: &str = "ATGGTGCACCTGACTCCTGAGGAGAAGTCTGCCGTTACTGCCCTGTGGGGCAAGGTGAACGTGGATGAAGTTGGTGGTGAGGCCCTGGGCAG";

    let kb = KnowledgeBase::builtin().context("built-in catalog is invalid")?;
    let Some(record) = kb.find_target("Sickle Cell Trait", "HBB") else {
        bail!("built-in catalog lacks the HBB sickle cell record");
    };

    let mut variant = HBB.as_bytes().to_vec();
    variant[5] = b'A';
    let result = align(&variant, HBB.as_bytes(), &Default::default());
    let caller = traitseq::MutationCaller::new(&kb);
    let call = caller.find_targeted_mutation(
        &result.aligned_query,
        &result.aligned_reference,
        record,
        0,
    );

    match call {
        Some(call) if call.position == 5 => {
            print_call(&call);
            println!("self-test passed");
            Ok(())
        }
        Some(call) => bail!("self-test called the variant at {} instead of 5", call.position),
        None => bail!("self-test did not detect the sickle cell substitution"),
    }
}

fn print_outcome(
    analyzer: &Analyzer,
    trait_name: &str,
    gene: &str,
    sequence: &Sequence,
    outcome: &AnalysisOutcome,
) {
    let record = AnalysisRecord::new(trait_name, gene, sequence, outcome);
    println!(
        "{} / {}: {} (length {}, GC {:.1}%)",
        record.trait_analyzed, record.gene, record.outcome, record.sequence_length, record.gc_content
    );

    let report = outcome.report();
    if let Some(warning) = &report.warning {
        println!("warning: {warning}");
    }
    for stats in report.alignment_statistics.values() {
        print_alignment(stats);
    }

    let summary = TraitSummary::from_report(report, analyzer.knowledge_base());
    println!(
        "calls: {} (known {}) against {} catalogued records",
        summary.matches_found, summary.known_variants, summary.total_analyzed
    );
    for call in &report.matches {
        print_call(call);
    }
}

fn print_alignment(stats: &AlignmentResult) {
    println!(
        "score={}\tlength={}\tmatch={:.1}%\tmismatches={}\tgaps={}",
        stats.score,
        stats.alignment_length,
        stats.match_percentage,
        stats.mismatch_count,
        stats.gap_count
    );
}

fn print_call(call: &MutationCall) {
    println!(
        "{}\t{}\t{}>{}\tquery_pos={}\taligned_pos={}\tcontext={}\t{}\t{}",
        call.gene,
        call.genomic_position,
        call.reference_base,
        call.observed_base,
        call.position,
        call.aligned_position,
        call.context,
        call.matched_record.rsid(),
        call.matched_record.trait_name()
    );
}
