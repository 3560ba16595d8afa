use std::io;
use std::sync::Arc;

use futures::{
  future::{select, Either},
  StreamExt,
};
use termion::{
  event::Key,
  raw::{IntoRawMode, RawTerminal},
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tui::{
  backend::TermionBackend,
  layout::{Alignment, Constraint, Direction, Layout},
  style::{Color, Modifier, Style},
  text::{Span, Spans, Text},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
  Terminal,
};

use crate::catalog::{Catalog, Selection};
use crate::render::{DocumentBody, ResultDocument, NO_SPECS_NOTICE};
use crate::search::{SearchOutcome, Searcher};

mod input;

const SELECTOR_HEIGHT: u16 = 12;
const RESULT_SCROLL_STEP: u16 = 3;

/// Which selector column is live. Stages cascade: confirming one resets
/// everything after it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
  Make,
  Model,
  Year,
}

pub struct UI {
  /// terminal abstraction
  terminal: Terminal<TermionBackend<RawTerminal<io::Stdout>>>,

  catalog: Arc<Catalog>,
  searcher: Searcher,

  stage: Stage,
  make_cursor: usize,
  model_cursor: usize,
  year_cursor: usize,

  chosen_make: Option<String>,
  chosen_model: Option<String>,
  chosen_year: Option<i32>,

  /// model options for the chosen make
  models: Vec<String>,
  years: Vec<i32>,

  /// token of the latest submitted search; outcomes tagged with
  /// anything older are stale and dropped
  search_seq: u64,
  searching: bool,

  document: Option<ResultDocument>,
  scroll: u16,
}

impl UI {
  pub fn new(catalog: Arc<Catalog>, searcher: Searcher) -> Self {
    let stdout = io::stdout()
      .into_raw_mode()
      .expect("Failed to put terminal into 'raw mode'");

    let backend = TermionBackend::new(stdout);
    let mut terminal = Terminal::new(backend).expect("Failed to initialize terminal abstraction");

    terminal.clear().expect("Failed to clear terminal");
    terminal.hide_cursor().expect("Failed to hide cursor");

    UI {
      terminal,
      catalog,
      searcher,
      stage: Stage::Make,
      make_cursor: 0,
      model_cursor: 0,
      year_cursor: 0,
      chosen_make: None,
      chosen_model: None,
      chosen_year: None,
      models: vec![],
      years: Catalog::year_options().collect(),
      search_seq: 0,
      searching: false,
      document: None,
      scroll: 0,
    }
  }

  /// Handles key and search events, redrawing after each one. Only
  /// redraws when an event has actually occurred.
  pub async fn listen(&mut self, outcomes: UnboundedReceiver<SearchOutcome>) {
    let mut keys = input::key_events();
    let mut outcomes = UnboundedReceiverStream::new(outcomes);

    let mut press = keys.next();
    let mut result = outcomes.next();

    loop {
      self.render();

      match select(press, result).await {
        Either::Left((key, result_continue)) => {
          match key {
            Some(key) => {
              if self.on_key(key) {
                break;
              }
            }
            None => break,
          }

          press = keys.next();
          result = result_continue;
        }

        Either::Right((outcome, press_continue)) => {
          match outcome {
            Some(outcome) => self.on_outcome(outcome),
            None => break,
          }

          press = press_continue;
          result = outcomes.next();
        }
      }
    }
  }

  /// true means quit
  fn on_key(&mut self, key: Key) -> bool {
    match key {
      Key::Char('q') | Key::Char('Q') => return true,
      Key::Ctrl(k) => {
        if matches!(k.to_ascii_lowercase(), 'c' | 'd') {
          return true;
        }
      }

      Key::Up => self.move_cursor(-1),
      Key::Down => self.move_cursor(1),
      Key::Char('\n') => self.confirm(),
      Key::Left | Key::Backspace => self.back(),

      Key::PageUp => self.scroll = self.scroll.saturating_sub(RESULT_SCROLL_STEP),
      Key::PageDown => self.scroll = self.scroll.saturating_add(RESULT_SCROLL_STEP),

      _ => (),
    }

    false
  }

  fn on_outcome(&mut self, outcome: SearchOutcome) {
    if outcome.seq != self.search_seq {
      tracing::debug!("dropping stale search #{}", outcome.seq);
      return;
    }

    self.searching = false;
    self.document = Some(outcome.document);
    self.scroll = 0;
  }

  fn move_cursor(&mut self, delta: isize) {
    let (cursor, len) = match self.stage {
      Stage::Make => (&mut self.make_cursor, self.catalog.makes().count()),
      Stage::Model => (&mut self.model_cursor, self.models.len()),
      Stage::Year => (&mut self.year_cursor, self.years.len()),
    };

    if len == 0 {
      return;
    }

    *cursor = cursor.saturating_add_signed(delta).min(len - 1);
  }

  /// Lock in the highlighted option and advance. Picking a make swaps
  /// the model options in and wipes everything downstream; picking a
  /// year kicks off the lookup.
  fn confirm(&mut self) {
    match self.stage {
      Stage::Make => {
        let Some(make) = self.catalog.makes().nth(self.make_cursor).map(str::to_string) else {
          return;
        };

        self.models = self.catalog.models_for(&make).to_vec();
        self.chosen_make = Some(make);
        self.chosen_model = None;
        self.model_cursor = 0;
        self.chosen_year = None;
        self.year_cursor = 0;
        self.invalidate_results();
        self.stage = Stage::Model;
      }

      Stage::Model => {
        let Some(model) = self.models.get(self.model_cursor).cloned() else { return };

        self.chosen_model = Some(model);
        self.chosen_year = None;
        self.year_cursor = 0;
        self.stage = Stage::Year;
      }

      Stage::Year => {
        let (Some(make), Some(model)) = (self.chosen_make.clone(), self.chosen_model.clone())
        else {
          return;
        };
        let Some(&year) = self.years.get(self.year_cursor) else { return };

        self.chosen_year = Some(year);
        self.search_seq += 1;
        self.searching = true;
        self
          .searcher
          .submit(self.catalog.clone(), Selection { make, model, year }, self.search_seq);
      }
    }
  }

  /// Step back one stage, deselecting it. Downstream choices and any
  /// displayed result go with it so nothing stale survives.
  fn back(&mut self) {
    match self.stage {
      Stage::Make => (),

      Stage::Model => {
        self.chosen_make = None;
        self.models = vec![];
        self.chosen_model = None;
        self.model_cursor = 0;
        self.chosen_year = None;
        self.year_cursor = 0;
        self.invalidate_results();
        self.stage = Stage::Make;
      }

      Stage::Year => {
        self.chosen_year = None;
        self.year_cursor = 0;
        self.invalidate_results();
        self.stage = Stage::Model;
      }
    }
  }

  /// Any in-flight search goes stale here: bumping the token means its
  /// outcome gets dropped on arrival.
  fn invalidate_results(&mut self) {
    self.search_seq += 1;
    self.searching = false;
    self.document = None;
    self.scroll = 0;
  }

  fn status_line(&self) -> String {
    let make = self.chosen_make.as_deref().unwrap_or("-");
    let model = self.chosen_model.as_deref().unwrap_or("-");
    let year = self.chosen_year.map(|y| y.to_string()).unwrap_or_else(|| "-".into());
    let busy = if self.searching { "  searching..." } else { "" };

    format!(" Make: {}   Model: {}   Year: {}{}", make, model, year, busy)
  }

  // draw based on state
  fn render(&mut self) {
    let make_items: Vec<String> = self.catalog.makes().map(str::to_string).collect();
    let model_items = self.models.clone();
    let year_items: Vec<String> = self.years.iter().map(i32::to_string).collect();

    let stage = self.stage;
    let cursors = (self.make_cursor, self.model_cursor, self.year_cursor);
    let status = self.status_line();
    let scroll = self.scroll;

    let result_lines = match &self.document {
      Some(document) => document_lines(document),
      None => vec![Spans::from(Span::styled(
        "Pick a make, model, and year to look up specs.",
        Style::default().fg(Color::DarkGray),
      ))],
    };

    self
      .terminal
      .draw(move |f| {
        let rows = Layout::default()
          .direction(Direction::Vertical)
          .constraints(
            [Constraint::Length(SELECTOR_HEIGHT), Constraint::Length(1), Constraint::Min(0)]
              .as_ref(),
          )
          .split(f.size());

        let columns = Layout::default()
          .direction(Direction::Horizontal)
          .constraints(
            [Constraint::Percentage(34), Constraint::Percentage(33), Constraint::Percentage(33)]
              .as_ref(),
          )
          .split(rows[0]);

        let (makes, mut make_state) =
          selector_column("Make", make_items, stage == Stage::Make, cursors.0);
        let (models, mut model_state) =
          selector_column("Model", model_items, stage == Stage::Model, cursors.1);
        let (years, mut year_state) =
          selector_column("Year", year_items, stage == Stage::Year, cursors.2);

        f.render_stateful_widget(makes, columns[0], &mut make_state);
        f.render_stateful_widget(models, columns[1], &mut model_state);
        f.render_stateful_widget(years, columns[2], &mut year_state);

        let status = Paragraph::new(Spans::from(vec![
          Span::raw(status),
          Span::styled(
            "   Up/Down move, Enter pick, Left back, PgUp/PgDn scroll, q quit",
            Style::default().fg(Color::DarkGray),
          ),
        ]))
        .alignment(Alignment::Left);
        f.render_widget(status, rows[1]);

        let results = Paragraph::new(Text::from(result_lines))
          .block(Block::default().title("Results").borders(Borders::ALL))
          .wrap(Wrap { trim: false })
          .scroll((scroll, 0));
        f.render_widget(results, rows[2]);
      })
      .expect("Failed to render")
  }
}

fn selector_column(
  title: &'static str,
  options: Vec<String>,
  active: bool,
  cursor: usize,
) -> (List<'static>, ListState) {
  let border = if active {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default()
  };

  let empty = options.is_empty();
  let items: Vec<ListItem> = options.into_iter().map(ListItem::new).collect();

  let list = List::new(items)
    .block(Block::default().title(title).borders(Borders::ALL).border_style(border))
    .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

  let mut state = ListState::default();
  if !empty {
    state.select(Some(cursor));
  }

  (list, state)
}

/// Flatten a result document into styled lines. All the shaping already
/// happened in the render layer; this only puts ink on it.
fn document_lines(document: &ResultDocument) -> Vec<Spans<'static>> {
  let mut lines = vec![
    Spans::from(Span::styled(
      document.heading.clone(),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Spans::from(""),
  ];

  if let Some(wiki) = &document.wiki {
    if let Some(image) = &wiki.image {
      lines.push(Spans::from(format!("Photo: {}", image)));
    }
    lines.push(Spans::from(wiki.description.clone()));
    lines.push(Spans::from(Span::styled(
      format!("Read more: {}", wiki.link),
      Style::default().fg(Color::Blue),
    )));
    lines.push(Spans::from(""));
  }

  match &document.body {
    DocumentBody::NoSpecs => lines.push(Spans::from(NO_SPECS_NOTICE)),

    DocumentBody::Specs { blocks } => {
      let plural = if blocks.len() == 1 { "" } else { "s" };
      lines.push(Spans::from(format!("Found {} matching trim{}:", blocks.len(), plural)));

      for block in blocks {
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(
          block.title.clone(),
          Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));

        if let Some(photo) = &block.photo {
          lines.push(Spans::from(format!("Photo: {}", photo)));
        }

        for field in &block.fields {
          lines.push(Spans::from(format!("{}: {}", field.label, field.value)));
        }
      }
    }
  }

  lines
}
