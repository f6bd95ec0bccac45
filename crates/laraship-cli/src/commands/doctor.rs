use laraship_core::CONFIG_FILE;
use laraship_docker::{CheckResult, DockerEngine};

pub async fn doctor(opts: &super::Options) -> anyhow::Result<()> {
    let engine = DockerEngine::new()?;
    let mut report = engine.doctor().await;

    report.config_file = if opts.path.join(CONFIG_FILE).exists() {
        CheckResult::ok("Found")
    } else {
        CheckResult::ok("Not found (defaults apply)")
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}
