use laraship_docker::DockerfileGenerator;

pub async fn build(opts: &super::Options) -> anyhow::Result<()> {
    let assembler = super::pipeline::assembler(opts)?;
    let tag = assembler.publish().await?;

    println!("{tag}");
    Ok(())
}

pub async fn dockerfile(opts: &super::Options) -> anyhow::Result<()> {
    let assembler = super::pipeline::assembler(opts)?;
    let image = assembler.build().await?;

    print!("{}", DockerfileGenerator::new(&image).render());
    Ok(())
}
