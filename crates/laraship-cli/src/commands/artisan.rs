pub async fn artisan(opts: &super::Options, command_line: &str) -> anyhow::Result<()> {
    let assembler = super::pipeline::assembler(opts)?;
    let output = assembler.artisan(command_line).await?;

    print!("{output}");
    Ok(())
}
