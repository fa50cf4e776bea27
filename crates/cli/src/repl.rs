//! Interactive mode – read key lines, dispatch them, print the display.

use crate::config::PresentationConfig;
use deskcalc_engine::event::tokenize_keys;
use deskcalc_engine::platform::TerminalPresenter;
use deskcalc_engine::AppContext;
use dialoguer::Input;

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

pub fn run_repl(presentation: &PresentationConfig) {
    let presenter = TerminalPresenter::new(presentation.width, presentation.show_mode);
    let ctx = AppContext::new(Box::new(presenter));

    tracing::debug!(width = presentation.width, "starting repl");
    println!("Keys separated by spaces (e.g. `3.5 + 2 =`, `90 sin`, `mode`). `quit` exits.");
    if let Err(e) = ctx.present() {
        eprintln!("error: {}", e);
        return;
    }

    loop {
        let line: String = match Input::new()
            .with_prompt(&presentation.prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(l) => l,
            Err(e) => {
                tracing::debug!(error = %e, "input closed");
                break;
            }
        };

        let trimmed = line.trim();
        if QUIT_WORDS.contains(&trimmed) {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        match tokenize_keys(trimmed) {
            Ok(events) => {
                ctx.with_calculator(|c| c.dispatch_all(events));
                if let Err(e) = ctx.present() {
                    eprintln!("error: {}", e);
                    break;
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}
