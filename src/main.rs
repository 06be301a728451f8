use anyhow::{bail, Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::path::Path;

use once_app::config::init_tracing;
use once_app::{
    announce_change, clear_history, export_history_csv, get_history, insert_record,
    open_database, speech_lang_tag, AmountParser, AppConfig, ConsoleSpeech, LineTransport,
    Sale, Segmenter, SerialCommand, SerialTransport, SpeechOutput, SpeechPhrases,
};

const USAGE: &str = "\
Usage: once-app <command> [args]

  parse <phrase>               Interpret one spoken/typed amount
  voice <transcript>           Split a transcript into total + received
  calc <total> <received>      Compute, announce and store the change
  history                      List stored sales (newest first)
  export <file.csv>            Write the history to CSV
  clear-history                Delete all stored sales
  serial <device> <text>       Send a line to a serial device
  serial <device> --config <model>";

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.log_filter);

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "parse" => run_parse(&config, &rest.join(" ")),
        "voice" => run_voice(&config, &rest.join(" ")),
        "calc" => match rest {
            [total, received] => run_calc(&config, total, received),
            _ => bail!("calc needs exactly two amounts (quote multi-word phrases)"),
        },
        "history" => run_history(&config),
        "export" => match rest {
            [path] => run_export(&config, Path::new(path)),
            _ => bail!("export needs a target file"),
        },
        "clear-history" => run_clear(&config),
        "serial" => run_serial(rest),
        "--version" | "-v" => {
            println!("ONCE App v{}", once_app::VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn load_parser(config: &AppConfig) -> Result<(AmountParser, Segmenter, String)> {
    let parser_config = config
        .parser_config()
        .context("Failed to load parser config")?;
    let parser = AmountParser::from_config(&parser_config);
    let segmenter = Segmenter::new(parser_config.keywords.clone());
    Ok((parser, segmenter, parser_config.locale))
}

fn run_parse(config: &AppConfig, phrase: &str) -> Result<()> {
    let (parser, _, _) = load_parser(config)?;

    match parser.parse_with_rule(phrase) {
        Ok((amount, rule)) => {
            println!("✓ {} € ({})", amount, rule);
            Ok(())
        }
        Err(e) => bail!("❌ No se pudo interpretar: {}", e),
    }
}

fn run_voice(config: &AppConfig, transcript: &str) -> Result<()> {
    let (parser, segmenter, _) = load_parser(config)?;
    let amounts = segmenter.segment_and_parse(&parser, transcript);

    if amounts.is_unrecognized() {
        bail!("❌ No se pudo interpretar. Inténtalo de nuevo.");
    }

    let show = |amount: Option<once_app::Amount>| match amount {
        Some(a) => format!("{} €", a),
        None => "-".to_string(),
    };

    println!("✓ Valores reconocidos");
    println!("   Total:    {}", show(amounts.total));
    println!("   Recibido: {}", show(amounts.received));
    if let Some(keyword) = amounts.keyword {
        println!("   Separador: \"{}\"", keyword);
    }

    Ok(())
}

fn run_calc(config: &AppConfig, total: &str, received: &str) -> Result<()> {
    let (parser, _, locale) = load_parser(config)?;

    let total = parser
        .parse(total)
        .with_context(|| format!("Invalid total '{}'", total))?;
    let received = parser
        .parse(received)
        .with_context(|| format!("Invalid amount received '{}'", received))?;

    let sale = Sale::settle(total, received)?;
    println!("El cambio a devolver es: {} €", sale.change);

    // locale tags like "es-ES" map through their language part
    let lang = locale.split('-').next().unwrap_or("es");
    let text = announce_change(sale.change, &SpeechPhrases::default());
    ConsoleSpeech.speak(&text, speech_lang_tag(lang))?;

    let conn = open_database(&config.db_path)?;
    let record = insert_record(&conn, &sale)?;
    println!("✓ Guardado en historial (#{})", record.id);

    Ok(())
}

fn run_history(config: &AppConfig) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let records = get_history(&conn)?;

    if records.is_empty() {
        println!("Historial vacío");
        return Ok(());
    }

    println!("{:<6} {:<20} {:>10} {:>10} {:>10}", "#", "Fecha", "Total", "Recibido", "Cambio");
    for record in &records {
        println!(
            "{:<6} {:<20} {:>10} {:>10} {:>10}",
            record.id,
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.total,
            record.received,
            record.change,
        );
    }
    println!("\n✓ {} registros", records.len());

    Ok(())
}

fn run_export(config: &AppConfig, path: &Path) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let written = export_history_csv(&conn, path)?;
    println!("✓ Exportados {} registros a {}", written, path.display());
    Ok(())
}

fn run_clear(config: &AppConfig) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let removed = clear_history(&conn)?;
    println!("✓ Eliminados {} registros", removed);
    Ok(())
}

fn run_serial(args: &[String]) -> Result<()> {
    let (device, command) = match args {
        [device, flag, model] if flag == "--config" => (
            device,
            SerialCommand::Configure {
                model: model.clone(),
            },
        ),
        [device, text @ ..] if !text.is_empty() => (device, SerialCommand::Raw(text.join(" "))),
        _ => bail!("serial needs a device and a command"),
    };

    let port = OpenOptions::new()
        .write(true)
        .open(device)
        .with_context(|| format!("Failed to open serial device {}", device))?;

    let mut transport = LineTransport::new(port);
    transport.send(&command)?;
    println!("✓ Enviado a {}", device);

    Ok(())
}
