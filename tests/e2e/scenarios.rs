use super::harness::{TestContext, parse_json_lines, write_file};

pub struct Scenario {
    pub name: &'static str,
    pub run: fn(&TestContext) -> Result<(), String>,
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "help_output",
            run: scenario_help,
        },
        Scenario {
            name: "version_output",
            run: scenario_version,
        },
        Scenario {
            name: "no_args_error",
            run: scenario_no_args,
        },
        Scenario {
            name: "clean_file",
            run: scenario_clean_file,
        },
        Scenario {
            name: "extra_index_url_fails",
            run: scenario_extra_index_url,
        },
        Scenario {
            name: "index_url_allow_list",
            run: scenario_index_url_allow_list,
        },
        Scenario {
            name: "config_allow_list",
            run: scenario_config_allow_list,
        },
        Scenario {
            name: "directory_walk",
            run: scenario_directory_walk,
        },
        Scenario {
            name: "json_output",
            run: scenario_json_output,
        },
        Scenario {
            name: "unknown_path",
            run: scenario_unknown_path,
        },
        Scenario {
            name: "unknown_file_name",
            run: scenario_unknown_file_name,
        },
        Scenario {
            name: "parse_error",
            run: scenario_parse_error,
        },
    ]
}

fn scenario_help(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("help")?;
    let output = ctx.run_yorkshire(&env, &["--help"])?;
    output.assert_success()?;
    output.assert_stdout_contains("Usage:")?;
    output.assert_stdout_contains("detect")?;
    Ok(())
}

fn scenario_version(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("version")?;
    for flag in ["--version", "-v"] {
        let output = ctx.run_yorkshire(&env, &[flag])?;
        output.assert_success()?;
        output.assert_stdout_contains(&format!("yorkshire {}", env!("CARGO_PKG_VERSION")))?;
    }
    Ok(())
}

fn scenario_no_args(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("no-args")?;
    let output = ctx.run_yorkshire(&env, &[])?;
    output.assert_status(2)?;
    output.assert_stderr_contains("No command specified")?;
    Ok(())
}

fn scenario_clean_file(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("clean-file")?;
    write_file(&env.root.join("requirements.txt"), "requests==2.31.0\n")?;

    let output = ctx.run_yorkshire(&env, &["detect", "requirements.txt"])?;
    output.assert_success()?;
    output.assert_stdout_contains("OK requirements.txt")?;
    Ok(())
}

fn scenario_extra_index_url(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("extra-index-url")?;
    write_file(
        &env.root.join("requirements.txt"),
        "--extra-index-url https://evil.example/simple\nrequests\n",
    )?;

    let output = ctx.run_yorkshire(&env, &["detect", "requirements.txt"])?;
    output.assert_status(1)?;
    output.assert_stdout_contains("FAIL requirements.txt")?;
    output.assert_stdout_contains("extra-index-url: https://evil.example/simple")?;
    output.assert_stderr_contains("extra-index-url options")?;
    Ok(())
}

fn scenario_index_url_allow_list(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("index-url")?;
    write_file(
        &env.root.join("Pipfile"),
        r#"
[[source]]
url = "https://pypi.org/simple"
name = "pypi"

[[source]]
url = "https://internal.example/simple"
name = "internal"
"#,
    )?;

    let output = ctx.run_yorkshire(
        &env,
        &[
            "detect",
            "--index-url",
            "https://pypi.org/simple",
            "--index-url",
            "https://internal.example/simple",
            "Pipfile",
        ],
    )?;
    output.assert_success()?;

    let output = ctx.run_yorkshire(
        &env,
        &["detect", "--index-url", "https://pypi.org/simple", "Pipfile"],
    )?;
    output.assert_status(1)?;
    output.assert_stdout_contains("https://internal.example/simple")?;
    Ok(())
}

fn scenario_config_allow_list(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("config")?;
    write_file(
        &env.xdg_config.join("yorkshire").join("config.json"),
        r#"{"index_urls": ["https://internal.example/simple"]}"#,
    )?;
    write_file(
        &env.root.join("pyproject.toml"),
        r#"
[[tool.poetry.source]]
name = "internal"
url = "https://internal.example/simple"
"#,
    )?;

    let output = ctx.run_yorkshire(&env, &["detect", "pyproject.toml"])?;
    output.assert_success()?;
    Ok(())
}

fn scenario_directory_walk(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("directory")?;
    write_file(&env.root.join("app").join("requirements.txt"), "flask\n")?;
    write_file(
        &env.root.join("lib").join("setup.py"),
        "setup(dependency_links=['https://internal.example/pkg'])\n",
    )?;
    write_file(&env.root.join("README.md"), "# demo\n")?;

    let output = ctx.run_yorkshire(&env, &["detect", "."])?;
    output.assert_status(1)?;
    output.assert_stdout_contains("OK ./app/requirements.txt")?;
    output.assert_stdout_contains("FAIL ./lib/setup.py")?;
    if output.stdout.contains("README") {
        return Err("README.md should not be checked".to_string());
    }
    Ok(())
}

fn scenario_json_output(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("json")?;
    write_file(
        &env.root.join("setup.cfg"),
        "[options]\ndependency_links = https://internal.example/pkg\n",
    )?;

    let output = ctx.run_yorkshire(&env, &["detect", "--json", "setup.cfg"])?;
    output.assert_status(1)?;
    let records = parse_json_lines(&output.stdout)?;
    if records.len() != 1 {
        return Err(format!("Expected one record, got {}", records.len()));
    }
    let record = &records[0];
    if record["okay"] != false || record["kind"] != "setup.cfg" {
        return Err(format!("Unexpected record: {}", record));
    }
    if record["findings"][0]["source"] != "dependency_links" {
        return Err(format!("Unexpected findings: {}", record["findings"]));
    }
    Ok(())
}

fn scenario_unknown_path(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("unknown-path")?;
    let output = ctx.run_yorkshire(&env, &["detect", "does-not-exist"])?;
    output.assert_status(2)?;
    output.assert_stderr_contains("is not a file, directory or URL")?;
    Ok(())
}

fn scenario_unknown_file_name(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("unknown-file")?;
    write_file(&env.root.join("environment.yml"), "name: demo\n")?;

    let output = ctx.run_yorkshire(&env, &["detect", "environment.yml"])?;
    output.assert_status(2)?;
    output.assert_stderr_contains("Unknown requirements file")?;
    Ok(())
}

fn scenario_parse_error(ctx: &TestContext) -> Result<(), String> {
    let env = ctx.create_env("parse-error")?;
    write_file(&env.root.join("Pipfile.lock"), "{ not json")?;

    let output = ctx.run_yorkshire(&env, &["detect", "Pipfile.lock"])?;
    output.assert_status(2)?;
    output.assert_stderr_contains("Failed to parse Pipfile.lock file")?;
    Ok(())
}
