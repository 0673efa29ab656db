//! Line-based terminal front end for a single player.

use std::io::{self, BufRead, Write};

use quiz_core::model::{Lifeline, OptionPosition, SessionId};
use services::{AnswerOutcome, GameService, PublicState, SessionError, SupportOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Answer(OptionPosition),
    Support,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let (Some(first), None) = (chars.next(), chars.next()) else {
        return Input::Unknown;
    };
    match first.to_ascii_uppercase() {
        'S' => Input::Support,
        'Q' => Input::Quit,
        letter => OptionPosition::from_letter(letter).map_or(Input::Unknown, Input::Answer),
    }
}

/// A menu number (1-based) or a wire name such as `fifty_fifty`.
fn parse_support_choice(line: &str, available: &[Lifeline]) -> Option<Lifeline> {
    let trimmed = line.trim();
    if let Ok(n) = trimmed.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| available.get(i).copied());
    }
    trimmed
        .parse::<Lifeline>()
        .ok()
        .filter(|lifeline| available.contains(lifeline))
}

fn render_question(state: &PublicState) -> String {
    let mut out = format!("\n--- Level {} ---\n{}\n", state.level, state.question);
    for (position, text) in OptionPosition::ALL.iter().zip(&state.options) {
        if state.is_removed(*position) {
            out.push_str(&format!("  {}) [REMOVED]\n", position.letter()));
        } else {
            out.push_str(&format!("  {}) {text}\n", position.letter()));
        }
    }
    let available: Vec<&str> = state
        .supports
        .available()
        .into_iter()
        .map(Lifeline::label)
        .collect();
    if available.is_empty() {
        out.push_str("Supports: none left\n");
    } else {
        out.push_str(&format!("Supports: {}\n", available.join(", ")));
    }
    out
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn prompt(output: &mut impl Write, text: &str) -> io::Result<()> {
    write!(output, "{text}")?;
    output.flush()
}

enum Turn {
    Continue(PublicState),
    GameOver,
    Quit,
}

/// Play games until the player quits or input ends.
pub async fn play(
    service: &GameService,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<()> {
    writeln!(output, "Welcome to the millionaire quiz!")?;
    loop {
        let id = SessionId::new_v4();
        let finished = play_one(service, id, input, output).await;
        service.end_session(id);
        if !finished? {
            writeln!(output, "Goodbye!")?;
            return Ok(());
        }

        prompt(output, "Play again? (y/n): ")?;
        match read_line(input)? {
            Some(line) if line.trim().eq_ignore_ascii_case("y") => {}
            _ => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
        }
    }
}

/// Returns `Ok(true)` when the game was decided and `Ok(false)` when the player left.
async fn play_one(
    service: &GameService,
    id: SessionId,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    let mut state = match service.start_session(id).await {
        Ok(state) => state,
        Err(err) => {
            writeln!(output, "Cannot start a game: {err}")?;
            return Ok(false);
        }
    };

    loop {
        write!(output, "{}", render_question(&state))?;
        prompt(output, "Your answer (A-D), S for support, Q to quit: ")?;
        let Some(line) = read_line(input)? else {
            return Ok(false);
        };

        let turn = match parse_input(&line) {
            Input::Quit => Turn::Quit,
            Input::Unknown => {
                writeln!(output, "Please enter A, B, C, D, S or Q.")?;
                Turn::Continue(state)
            }
            Input::Answer(position) => answer(service, id, position, state, output).await?,
            Input::Support => support(service, id, state, input, output).await?,
        };

        match turn {
            Turn::Continue(next) => state = next,
            Turn::GameOver => return Ok(true),
            Turn::Quit => return Ok(false),
        }
    }
}

async fn answer(
    service: &GameService,
    id: SessionId,
    position: OptionPosition,
    state: PublicState,
    output: &mut impl Write,
) -> io::Result<Turn> {
    match service.submit_answer(id, position.value()).await {
        Ok(AnswerOutcome::Correct { correct, state }) => {
            writeln!(output, "✅ Correct! The answer was {}.", correct.letter())?;
            Ok(Turn::Continue(state))
        }
        Ok(AnswerOutcome::Won { correct }) => {
            writeln!(output, "✅ Correct! The answer was {}.", correct.letter())?;
            writeln!(output, "🏆 You answered every level. You win!")?;
            Ok(Turn::GameOver)
        }
        Ok(AnswerOutcome::Lost {
            correct,
            submitted,
            explanation,
        }) => {
            writeln!(
                output,
                "❌ Wrong! You chose {} but the answer was {}.",
                submitted.letter(),
                correct.letter()
            )?;
            writeln!(output, "{explanation}")?;
            writeln!(output, "Game over at level {}.", state.level)?;
            Ok(Turn::GameOver)
        }
        Err(SessionError::Game(err)) => {
            writeln!(output, "{err}")?;
            Ok(Turn::Continue(state))
        }
        Err(err) => {
            writeln!(output, "{err}")?;
            Ok(Turn::GameOver)
        }
    }
}

async fn support(
    service: &GameService,
    id: SessionId,
    state: PublicState,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Turn> {
    let available = state.supports.available();
    if available.is_empty() {
        writeln!(output, "No supports left.")?;
        return Ok(Turn::Continue(state));
    }

    writeln!(output, "Supports:")?;
    for (n, lifeline) in available.iter().enumerate() {
        writeln!(output, "  {}) {}", n + 1, lifeline.label())?;
    }
    prompt(output, "Choose a support by number or name (Enter to go back): ")?;
    let Some(line) = read_line(input)? else {
        return Ok(Turn::Quit);
    };
    let Some(lifeline) = parse_support_choice(&line, &available) else {
        return Ok(Turn::Continue(state));
    };

    match service.use_support(id, lifeline).await {
        Ok(SupportOutcome::FiftyFifty { removed, .. }) => {
            let letters: Vec<String> = removed.iter().map(|p| p.letter().to_string()).collect();
            writeln!(output, "50/50 removed options {}.", letters.join(" and "))?;
        }
        Ok(SupportOutcome::ChangeQuestion { .. }) => {
            writeln!(output, "Here is a different question.")?;
        }
        Ok(SupportOutcome::AiSupport { hint, .. }) => {
            writeln!(output, "{}", hint.text)?;
        }
        Err(err) => writeln!(output, "{err}")?,
    }

    match service.state(id).await {
        Ok(next) => Ok(Turn::Continue(next)),
        Err(err) => {
            writeln!(output, "{err}")?;
            Ok(Turn::GameOver)
        }
    }
}
