//! Interactive browse mode.
//!
//! A line-oriented stand-in for the medicines page: the list of cards, one expandable card at a
//! time, an update/delete modal bound to the expanded card, a create form and prefix search.

use medstock_client::render::{render_list, render_modal, render_search, render_status};
use medstock_client::{Controller, MedicineClient, ModalState, StatusKind};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "medstock> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Refresh,
    /// Expand or collapse a card
    Open(String),
    Edit,
    Remove,
    /// Submit the edit modal. `None` leaves that field unchanged.
    Save {
        price: Option<String>,
        new_name: Option<String>,
    },
    Confirm,
    Cancel,
    Search(String),
    Add {
        name: String,
        price: String,
    },
    Help,
    Quit,
}

/// Parses one input line. Quoting follows shell rules so names may contain spaces.
pub fn parse(line: &str) -> Result<BrowseCommand, String> {
    let tokens = shlex::split(line).ok_or_else(|| "Invalid quoting".to_string())?;
    let Some((cmd, args)) = tokens.split_first() else {
        return Err("Type 'help' for commands".into());
    };

    match (cmd.as_str(), args) {
        ("list" | "refresh", []) => Ok(BrowseCommand::Refresh),
        ("open", [_, ..]) => Ok(BrowseCommand::Open(args.join(" "))),
        ("edit", []) => Ok(BrowseCommand::Edit),
        ("remove", []) => Ok(BrowseCommand::Remove),
        ("save", [price, rest @ ..]) => Ok(BrowseCommand::Save {
            price: (price != "-").then(|| price.clone()),
            new_name: (!rest.is_empty()).then(|| rest.join(" ")),
        }),
        ("confirm", []) => Ok(BrowseCommand::Confirm),
        ("cancel", []) => Ok(BrowseCommand::Cancel),
        ("search", [_, ..]) => Ok(BrowseCommand::Search(args.join(" "))),
        ("add", [name, price]) => Ok(BrowseCommand::Add {
            name: name.clone(),
            price: price.clone(),
        }),
        ("help", _) => Ok(BrowseCommand::Help),
        ("quit" | "exit", []) => Ok(BrowseCommand::Quit),
        ("open" | "search" | "save" | "add", _) => Err(format!("Missing arguments for '{cmd}'")),
        _ => Err(format!("Unknown command '{cmd}', type 'help' for commands")),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list                     Reload the list and the average price");
    println!("  open <name>              Expand or collapse a medicine card");
    println!("  edit                     Update the expanded medicine");
    println!("  remove                   Delete the expanded medicine");
    println!("  save <price|-> [name]    Submit the update ('-' keeps the price)");
    println!("  confirm                  Confirm the delete");
    println!("  cancel                   Close the update or delete dialog");
    println!("  search <prefix>          Find the first medicine starting with <prefix>");
    println!("  add <name> <price>       Create a medicine (quote names with spaces)");
    println!("  quit                     Leave browse mode");
}

fn print_view(controller: &mut Controller) {
    println!("{}", render_list(controller.view()));
    if let Some(modal) = render_modal(controller.view()) {
        println!("{modal}");
    }
    print_status(controller);
}

fn print_status(controller: &mut Controller) {
    if let Some(status) = render_status(controller.view()) {
        println!("{status}");
    }
    controller.view_mut().clear_status();
}

/// Applies one command. Returns `false` once the user asks to leave.
pub async fn apply(controller: &mut Controller, command: BrowseCommand) -> bool {
    let is_edit = command == BrowseCommand::Edit;
    match command {
        BrowseCommand::Quit => return false,
        BrowseCommand::Help => {
            print_help();
            return true;
        }
        BrowseCommand::Refresh => {
            controller.refresh().await;
        }
        BrowseCommand::Open(name) => {
            if controller.view().find(&name).is_none() {
                controller
                    .view_mut()
                    .set_status(StatusKind::Error, "Medicine not found");
            } else {
                controller.view_mut().toggle_card(&name);
            }
        }
        BrowseCommand::Edit | BrowseCommand::Remove => {
            let Some(selected) = controller.view().selection().map(str::to_owned) else {
                controller
                    .view_mut()
                    .set_status(StatusKind::Error, "Open a card first.");
                print_status(controller);
                return true;
            };
            let view = controller.view_mut();
            if is_edit {
                view.open_edit(&selected);
            } else {
                view.open_delete(&selected);
            }
        }
        BrowseCommand::Save { price, new_name } => {
            if !matches!(controller.view().modal(), ModalState::Edit { .. }) {
                controller
                    .view_mut()
                    .set_status(StatusKind::Error, "No update in progress.");
                print_status(controller);
                return true;
            }
            controller
                .submit_edit(price.as_deref(), new_name.as_deref())
                .await;
        }
        BrowseCommand::Confirm => {
            if !matches!(controller.view().modal(), ModalState::DeleteConfirm { .. }) {
                controller
                    .view_mut()
                    .set_status(StatusKind::Error, "No delete in progress.");
                print_status(controller);
                return true;
            }
            controller.confirm_delete().await;
        }
        BrowseCommand::Cancel => controller.view_mut().close_modal(),
        BrowseCommand::Search(prefix) => {
            println!("{}", render_search(&controller.view().search(&prefix)));
            return true;
        }
        BrowseCommand::Add { name, price } => {
            controller.create(&name, &price).await;
        }
    }
    print_view(controller);
    true
}

pub async fn run(client: MedicineClient) -> anyhow::Result<()> {
    let mut controller = Controller::new(client);
    controller.refresh().await;
    print_view(&mut controller);
    println!("Type 'help' for commands");

    let mut rl = DefaultEditor::new()?;
    loop {
        let line = tokio::task::block_in_place(|| rl.readline(PROMPT));
        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if let Err(e) = rl.add_history_entry(trimmed) {
                    tracing::debug!("failed to record history entry: {:?}", e);
                }

                match parse(trimmed) {
                    Ok(command) => {
                        if !apply(&mut controller, command).await {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::debug!("readline failed: {:?}", e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}
