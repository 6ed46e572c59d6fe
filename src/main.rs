use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, MouseButton, MouseEventKind,
};
use crossterm::{execute, terminal};
use separo::config::GameConfig;
use separo::core::Color;
use separo::display::{surface_to_grid, TerminalRenderer};
use separo::error::is_stopped;
use separo::game::{GameHost, PlayerKind, PlayerSelection};
use separo::gesture::{InputEvent, InputModality};
use separo::logic::{RulesOracle, SeparoRules};
use separo::player::input_queue;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 端末は描画に使うのでログはファイルへ
    let log_file = std::fs::File::create("separo.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            info!("using default config ({})", e);
            GameConfig::default()
        }
    };

    // ターミナル初期化
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;

    let res = run(config).await;

    // ターミナル復帰
    execute!(
        io::stdout(),
        DisableFocusChange,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;

    match res {
        Err(e) if is_stopped(&e) => {
            println!("Interrupted by user.");
            Ok(())
        }
        res => res,
    }
}

/// 数字キーで選ぶ。`q` なら None
fn select(title: &str, options: &[&str]) -> anyhow::Result<Option<usize>> {
    execute!(
        io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        crossterm::cursor::MoveTo(0, 0)
    )?;
    print!("=== Separo ===\r\n");
    print!("\r\n{}\r\n", title);
    for (i, option) in options.iter().enumerate() {
        print!("{}. {}\r\n", i + 1, option);
    }
    print!("q. Quit\r\n");
    io::Write::flush(&mut io::stdout())?;

    loop {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(None),
                    KeyCode::Char(c) => {
                        if let Some(n) = c.to_digit(10) {
                            let n = n as usize;
                            if (1..=options.len()).contains(&n) {
                                return Ok(Some(n - 1));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

async fn run(config: GameConfig) -> anyhow::Result<()> {
    let labels: Vec<&str> = PlayerKind::ALL.iter().map(|k| k.label()).collect();

    let mut kinds = [PlayerKind::Human; 2];
    for color in Color::ALL {
        let title = format!("Select {} player:", color.label());
        match select(&title, &labels)? {
            Some(i) => kinds[color.index()] = PlayerKind::ALL[i],
            None => return Ok(()),
        }
    }
    let selection = PlayerSelection {
        first: kinds[0],
        second: kinds[1],
    };
    info!("players: {:?}", selection);

    let oracle: Arc<dyn RulesOracle> = Arc::new(SeparoRules::new());
    let renderer = Arc::new(TerminalRenderer::new(
        Arc::clone(&oracle),
        config.guide,
        config.input,
    ));
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (stop_tx, stop_rx) = watch::channel(false);

    let done = Arc::new(AtomicBool::new(false));
    let pump = spawn_input_pump(
        input_tx,
        stop_tx,
        config.input,
        Arc::clone(&renderer),
        Arc::clone(&done),
    );

    let host = GameHost::new(config, oracle, renderer, stop_rx).with_input(input_queue(input_rx));
    let res = host.run(selection).await;

    done.store(true, Ordering::SeqCst);
    if pump.join().is_err() {
        warn!("input thread panicked");
    }

    let outcome = res?;
    if let Some(path) = &outcome.kifu_path {
        print!("Kifu saved: {}\r\n", path.display());
    }
    print!("Press any key to exit.\r\n");
    io::Write::flush(&mut io::stdout())?;
    loop {
        if let Event::Key(_) = event::read()? {
            break;
        }
    }
    Ok(())
}

/// 端末イベントを盤面座標の入力イベントに変換して送る
fn spawn_input_pump(
    tx: mpsc::UnboundedSender<InputEvent>,
    stop: watch::Sender<bool>,
    modality: InputModality,
    renderer: Arc<TerminalRenderer>,
    done: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !done.load(Ordering::SeqCst) {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("terminal poll failed: {}", e);
                    break;
                }
            }
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    warn!("terminal read failed: {}", e);
                    break;
                }
            };

            let input = match ev {
                Event::Mouse(mouse) => {
                    let pos = surface_to_grid(mouse.column, mouse.row);
                    match (modality, mouse.kind) {
                        (InputModality::Pointer, MouseEventKind::Down(MouseButton::Left)) => {
                            Some(InputEvent::PointerDown(pos))
                        }
                        (InputModality::Pointer, MouseEventKind::Drag(MouseButton::Left)) => {
                            Some(InputEvent::PointerMove(pos))
                        }
                        (InputModality::Pointer, MouseEventKind::Up(MouseButton::Left)) => {
                            Some(InputEvent::PointerUp(pos))
                        }
                        (InputModality::Tap, MouseEventKind::Down(MouseButton::Left)) => {
                            Some(InputEvent::Tap(pos))
                        }
                        _ => None,
                    }
                }
                Event::FocusLost => Some(InputEvent::PointerLeave),
                Event::Key(key) => match key.code {
                    KeyCode::Esc => Some(InputEvent::Cancel),
                    KeyCode::Char('q') => {
                        let _ = stop.send(true);
                        None
                    }
                    KeyCode::Char('g') => {
                        let on = renderer.toggle_guide();
                        info!("guide turned {}", if on { "on" } else { "off" });
                        None
                    }
                    _ => None,
                },
                _ => None,
            };

            if let Some(input) = input {
                if tx.send(input).is_err() {
                    break;
                }
            }
        }
    })
}
