use std::io::{self, BufRead, Write};
use std::time::Instant;

use clap::Parser;

use chess_rules::config::{CastlingRule, RulesConfig};
use chess_rules::game::{Game, Selection};
use chess_rules::perft::run_perft_parallel;
use chess_rules::types::Position;

const HELP: &str = "\
Commands:
  e2 e4        move the piece on e2 to e4
  moves <sq>   list the legal targets of the piece on <sq>
  select <sq>  click a square: select a piece, then click its target
  undo         take back the last move
  history      show the move list
  status       show whose turn it is
  new          start over
  help         show this text
  quit         leave";

#[derive(Parser, Debug)]
#[command(name = "chess_rules")]
#[command(about = "Play chess between two humans on the console")]
struct Args {
    /// Allow castling out of check and across attacked squares
    #[arg(long)]
    permissive_castling: bool,

    /// Call a draw when neither side has mating material
    #[arg(long)]
    material_draw: bool,

    /// Print a timestamped line for every move
    #[arg(short, long)]
    verbose: bool,

    /// Draw the board with letters instead of unicode symbols
    #[arg(long)]
    ascii: bool,

    /// Count the leaf nodes of the move tree to this depth and exit
    #[arg(long)]
    perft: Option<u8>,
}

impl Args {
    fn rules(&self) -> RulesConfig {
        RulesConfig {
            castling: if self.permissive_castling {
                CastlingRule::Permissive
            } else {
                CastlingRule::Standard
            },
            insufficient_material_draw: self.material_draw,
            verbose: self.verbose,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let mut game = Game::with_config(args.rules());

    if let Some(depth) = args.perft {
        for depth in 1..=depth {
            let now = Instant::now();
            let nodes = run_perft_parallel(&game, depth);
            println!(
                "depth {}: {} nodes ({:.3}s)",
                depth,
                nodes,
                now.elapsed().as_secs_f32()
            );
        }
        return Ok(());
    }

    println!(
        "Game started {}. Type `help` for commands.",
        game.start_time().format("%Y-%m-%d %H:%M:%S")
    );
    show(&game, args.ascii);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("{}> ", game.current_player());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["help"] => println!("{HELP}"),
            ["status"] => println!("{}", game.get_game_status()),
            ["history"] => {
                for line in game.get_move_history() {
                    println!("{line}");
                }
            }
            ["new"] => {
                game.reset();
                show(&game, args.ascii);
            }
            ["undo"] => match game.try_undo() {
                Ok(()) => show(&game, args.ascii),
                Err(err) => eprintln!("{err}"),
            },
            ["moves", square] => match square.parse::<Position>() {
                Ok(pos) => {
                    let targets = game.legal_moves_from(pos);
                    if targets.is_empty() {
                        println!("no legal moves from {pos}");
                    } else {
                        println!(
                            "{}",
                            targets
                                .iter()
                                .map(Position::to_algebraic)
                                .collect::<Vec<_>>()
                                .join(" ")
                        );
                    }
                }
                Err(err) => eprintln!("{err}"),
            },
            ["select", square] => match square.parse::<Position>() {
                Ok(pos) => {
                    let moves_before = game.move_log().len();
                    let accepted = game.select_square(pos);
                    match game.selection() {
                        Selection::Selected { position, .. } => {
                            println!("selected {position}")
                        }
                        Selection::Idle if game.move_log().len() > moves_before => {
                            show(&game, args.ascii)
                        }
                        Selection::Idle if accepted => println!("selection cleared"),
                        Selection::Idle => println!("nothing to select on {pos}"),
                    }
                }
                Err(err) => eprintln!("{err}"),
            },
            [from, to] => match (from.parse::<Position>(), to.parse::<Position>()) {
                (Ok(from), Ok(to)) => {
                    let outcome = game.make_move(from, to);
                    if outcome.success {
                        show(&game, args.ascii);
                    } else {
                        eprintln!("{}", outcome.message);
                    }
                }
                (Err(err), _) | (_, Err(err)) => eprintln!("{err}"),
            },
            _ => eprintln!("unknown command, type `help`"),
        }
    }

    println!(
        "Bye. Played {} plies since {}.",
        game.move_log().len(),
        game.start_time().format("%H:%M:%S")
    );
    Ok(())
}

fn show(game: &Game, ascii: bool) {
    println!("{}", game.board().draw_board(!ascii));
    if let Some(last) = game.move_log().last() {
        println!("last move: {last}");
    }
    println!("{}", game.captured_summary());
    println!("{}", game.get_game_status());
    if game.is_game_over() {
        println!("Game over. `undo` or `new` to continue.");
    }
    println!();
}
