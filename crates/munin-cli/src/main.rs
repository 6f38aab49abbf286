//! Munin CLI: meeting transcript in, validated outputs out.
//!
//! Usage:
//!   cargo run -p munin-cli -- meeting.txt [--provider openai|gemini|ollama] [--model NAME]
//!
//! Reads the transcript, runs the fact pipeline, prints a report, and writes
//! meeting_outputs.json to the output directory.

use std::path::PathBuf;
use std::process::ExitCode;

use munin_core::{
    create_generator, process_meeting, GeneratorConfig, MeetingDocument, PipelineConfig, Provider,
    SkillLibrary,
};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut transcript_path = PathBuf::from("transcript.txt");
    let mut output_dir = PathBuf::from(".");
    let mut skills_dir: Option<PathBuf> = None;
    let mut provider = Provider::OpenAi;
    let mut model: Option<String> = None;
    let mut config = PipelineConfig::from_env();

    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--provider" => {
                if let Some(p) = args.next() {
                    match Provider::parse(&p) {
                        Some(parsed) => provider = parsed,
                        None => {
                            eprintln!("Unknown provider '{}'. Use openai, gemini, or ollama.", p);
                            return ExitCode::FAILURE;
                        }
                    }
                }
            }
            "--model" => model = args.next(),
            "--output-dir" => {
                if let Some(d) = args.next() {
                    output_dir = PathBuf::from(d);
                }
            }
            "--skills-dir" => skills_dir = args.next().map(PathBuf::from),
            "--no-judge" => config.judge_enabled = false,
            "--help" | "-h" => {
                usage();
                return ExitCode::SUCCESS;
            }
            other => transcript_path = PathBuf::from(other),
        }
    }

    let transcript = match std::fs::read_to_string(&transcript_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Cannot read transcript {}: {}", transcript_path.display(), e);
            usage();
            return ExitCode::FAILURE;
        }
    };

    let skills = match skills_dir {
        Some(dir) => SkillLibrary::from_dir(&dir),
        None => SkillLibrary::from_dir(&PathBuf::from("skills")),
    };

    let model = model.unwrap_or_else(|| provider.default_model().to_string());
    let generator = match create_generator(provider, GeneratorConfig::new(model)) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Cannot create {} generator: {}", provider.as_str(), e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        provider = provider.as_str(),
        transcript = %transcript_path.display(),
        "processing meeting"
    );

    let record = match process_meeting(&transcript, generator.as_ref(), &skills, &config).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Pipeline failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let document = MeetingDocument::from_record(&record);
    print_report(&document);

    if document.summary.trim().is_empty()
        && document.action_points.is_empty()
        && document.todos.is_empty()
        && document.follow_up_emails.is_empty()
    {
        eprintln!("No outputs produced; nothing written.");
        return ExitCode::FAILURE;
    }

    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!("Cannot create output dir {}: {}", output_dir.display(), e);
        return ExitCode::FAILURE;
    }
    let out_path = output_dir.join("meeting_outputs.json");
    let json = match serde_json::to_string_pretty(&document) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Cannot serialize outputs: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = std::fs::write(&out_path, json) {
        eprintln!("Cannot write {}: {}", out_path.display(), e);
        return ExitCode::FAILURE;
    }
    info!("outputs written to {}", out_path.display());
    ExitCode::SUCCESS
}

fn usage() {
    eprintln!("Munin — meeting transcript processor");
    eprintln!("  munin [TRANSCRIPT]        Transcript file (default transcript.txt)");
    eprintln!("  --provider NAME           openai (default), gemini, or ollama");
    eprintln!("  --model NAME              Override the provider's default model");
    eprintln!("  --output-dir DIR          Where meeting_outputs.json lands (default .)");
    eprintln!("  --skills-dir DIR          Skill markdown directory (default ./skills)");
    eprintln!("  --no-judge                Skip the AI-judge quality gate");
    eprintln!();
    eprintln!("Requires OPENAI_API_KEY or GOOGLE_API_KEY for cloud providers.");
    eprintln!("Ollama uses OLLAMA_BASE_URL or http://localhost:11434.");
}

fn print_report(document: &MeetingDocument) {
    println!("\n=== MEETING SUMMARY ===\n{}\n", document.summary);

    println!("=== ACTION POINTS ({}) ===", document.action_points.len());
    for (i, ap) in document.action_points.iter().enumerate() {
        println!("{}. [{:?}] {}", i + 1, ap.priority, ap.description);
    }

    println!("\n=== TO-DOS ({}) ===", document.todos.len());
    for (i, td) in document.todos.iter().enumerate() {
        match &td.deadline {
            Some(d) => println!("{}. {} (due: {})", i + 1, td.task, d),
            None => println!("{}. {}", i + 1, td.task),
        }
    }

    println!("\n=== FOLLOW-UP EMAILS ({}) ===", document.follow_up_emails.len());
    for email in &document.follow_up_emails {
        println!("Subject: {}\n{}\n", email.subject, email.body);
    }

    let meta = &document.metadata;
    println!(
        "=== STATS ===\nfacts extracted: {} | validated: {} | discarded: {}",
        meta.total_facts_extracted, meta.total_facts_validated, meta.facts_discarded
    );
    if meta.compliance_passed {
        println!("compliance: PASS");
    } else {
        println!("compliance: FAIL");
        for issue in &meta.compliance_issues {
            println!("  - {}", issue);
        }
    }
}
