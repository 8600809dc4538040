// Configuration lookup and its effect on resolution.

use anyhow::Result;
use bmad_resolver::config::ResolverConfig;
use bmad_resolver::core::{ContentType, ResolverError};
use bmad_resolver::resolver::{ResolveOptions, resolve};
use bmad_resolver::test_utils::ContentTreeFixture;
use serial_test::serial;

async fn options_for(tree: &ContentTreeFixture) -> Result<ResolveOptions> {
    let config = ResolverConfig::load(tree.root(), None).await?;
    Ok(ResolveOptions::default().with_config(config))
}

#[tokio::test]
#[serial]
async fn test_root_config_excludes_and_restricts_seeds() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file(
        "bmad-resolver.toml",
        r#"
[resolver]
seed_types = ["agent"]
exclude = ["agents/draft-*.md", "_module-installer/**"]
"#,
    )?;
    tree.add_file("core/agents/master.md", "@task-run")?;
    tree.add_file("core/agents/draft-idea.md", "@task-unused")?;
    tree.add_file("core/tasks/run.md", "# Run")?;
    tree.add_file("core/tasks/unused.md", "# Unused")?;
    tree.add_file("core/_module-installer/install-config.yaml", "name: core")?;

    let options = options_for(&tree).await?;
    let result = resolve(tree.root(), &[], &options).await?;

    assert_eq!(result.primary_files.len(), 1);
    assert_eq!(result.primary_files[0].content_type, ContentType::Agent);
    assert_eq!(result.all_files, vec![tree.path("core/agents/master.md"), tree.path("core/tasks/run.md")]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_custom_extension_and_marker() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    tree.add_file(
        "bmad-resolver.toml",
        r#"
[resolver]
default_extension = ".xml"
project_root_marker = "{root}"
"#,
    )?;
    tree.add_file(
        "core/agents/a.md",
        "@task-flow\n<step exec=\"{root}/bmad/core/tasks/check.xml\"/>\n",
    )?;
    tree.add_file("core/tasks/flow.md", "# md variant")?;
    tree.add_file("core/tasks/flow.xml", "<task/>")?;
    tree.add_file("core/tasks/check.xml", "<task/>")?;

    let options = options_for(&tree).await?;
    assert_eq!(options.config.default_extension, "xml");

    let result = resolve(tree.root(), &[], &options).await?;
    let targets = result.graph.references_from(&tree.path("core/agents/a.md"));
    assert_eq!(targets, vec![tree.path("core/tasks/flow.xml"), tree.path("core/tasks/check.xml")]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_environment_variable_config() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    let config_path = tree.add_file("elsewhere/custom.toml", "[resolver]\nseed_types = [\"task\"]\n")?;
    tree.add_file("bmad-resolver.toml", "[resolver]\nseed_types = [\"agent\"]\n")?;

    unsafe {
        std::env::set_var("BMAD_RESOLVER_CONFIG", &config_path);
    }
    let loaded = ResolverConfig::load(tree.root(), None).await;
    unsafe {
        std::env::remove_var("BMAD_RESOLVER_CONFIG");
    }

    assert_eq!(loaded?.seed_types, vec![ContentType::Task]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_malformed_and_missing_config_files() -> Result<()> {
    let tree = ContentTreeFixture::new()?;
    let broken = tree.add_file("broken.toml", "[resolver\nexclude = 1")?;

    let err = ResolverConfig::load(tree.root(), Some(&broken)).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ResolverError>(), Some(ResolverError::ConfigParseError { .. })));

    let err = ResolverConfig::load(tree.root(), Some(&tree.path("absent.toml"))).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ResolverError>(), Some(ResolverError::ConfigError { .. })));

    let bad_type = tree.add_file("bad-type.toml", "[resolver]\nseed_types = [\"widget\"]\n")?;
    assert!(ResolverConfig::load(tree.root(), Some(&bad_type)).await.is_err());
    Ok(())
}
