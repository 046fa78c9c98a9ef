use clap::Parser;
use std::path::Path;
use uuid::Uuid;

use affirm_flow::actions::ActionContext;
use affirm_flow::session::{NextStep, SessionController};
use affirm_flow::wire::SummaryKind;
use affirm_flow::{cli, config, flow, log, provider, template, ux};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.merge_args(&args);

    let flow = flow::FlowConfig::preset(args.variant);
    let agent = provider::make_agent(
        cfg.provider,
        cfg.model.clone(),
        cfg.timeout_secs,
        cfg.ollama_url.clone(),
    );
    let templates = template::TomlTemplateStore::load_or_empty(
        cfg.templates_path.as_deref().map(Path::new),
        args.variant.id(),
    );

    let session_id = Uuid::new_v4();
    let session_log = log::SessionLog::new(Path::new(&cfg.root), session_id);
    if args.debug {
        log::print_session_dir(&session_log);
    }

    let acx = ActionContext {
        agent: agent.as_ref(),
        templates: &templates,
        flow: &flow,
        log: Some(&session_log),
        default_temperature: cfg.temperature,
        debug: args.debug,
    };

    // ===== Intake =====
    let name = match &args.name {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => ux::ask_name(),
    };
    let mut ctrl = SessionController::new(name, flow.clone());
    ctrl.ctx.familiarity = ux::ask_familiarity();
    ctrl.ctx.topic = ux::ask_topic();

    // ===== Discovery loop =====
    loop {
        ux::show_generating("your next question");
        let screen = ctrl.fetch_screen(&acx).await;

        if let Some(err) = &screen.error {
            ux::show_error(err);
            if ux::confirm("Try again?") {
                continue;
            }
            println!("Session ended.");
            return Ok(());
        }

        if ctrl.handle_skip(&screen) {
            // No exchange for a skipped step; straight to the one after it.
            continue;
        }

        ux::show_screen(&screen, ctrl.current_screen());
        let answer = ux::read_answer(&screen, &flow);
        if ctrl.submit_answer(&screen.question, answer) == NextStep::GenerateAffirmations {
            break;
        }
    }

    // ===== Affirmation batches =====
    let pre = ctrl.fetch_summary(&acx, SummaryKind::Pre).await;
    if !pre.is_empty() {
        println!("\n{}", pre);
    }

    loop {
        ux::show_generating("affirmations");
        let batch = ctrl.fetch_affirmations(&acx).await;

        if let Some(err) = &batch.error {
            ux::show_error(err);
            if ux::confirm("Try again?") {
                continue;
            }
            break;
        }

        let total = batch.affirmations.len();
        for (i, affirmation) in batch.affirmations.into_iter().enumerate() {
            let keep = ux::review_affirmation(i, total, &affirmation);
            ctrl.review(affirmation, keep);
        }

        if !ux::confirm("Generate another batch?") {
            break;
        }
    }

    ux::show_kept(&ctrl.feedback.approved);

    let post = ctrl.fetch_summary(&acx, SummaryKind::Post).await;
    if !post.is_empty() {
        println!("\n{}", post);
    }

    Ok(())
}
