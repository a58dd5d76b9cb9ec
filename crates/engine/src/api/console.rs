//! JSON-lines transport over any async reader/writer pair.
//!
//! One command per input line, one reply per output line:
//!
//! ```text
//! {"type":"start","actorId":"42","scopeId":"guild-1","name":"Brakka"}
//! {"type":"interact","actorId":"42","scopeId":"guild-1","eventId":"class_warrior"}
//! {"type":"abandon","actorId":"42"}
//! {"type":"sheet","actorId":"42","scopeId":"guild-1"}
//! ```

use sagaforge_domain::{ActorId, CharacterId, CharacterName, DraftSeed, ScopeId, SessionView};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::app::App;
use crate::use_cases::{
    CharacterOpError, CharacterSheet, CreationError, DispatchOutcome, Interaction,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    Start {
        actor_id: ActorId,
        scope_id: ScopeId,
        name: String,
    },
    Interact(Interaction),
    Abandon {
        actor_id: ActorId,
    },
    Sheet {
        actor_id: ActorId,
        scope_id: ScopeId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Reply {
    Session { view: SessionView },
    Created { character_id: CharacterId, name: String },
    Abandoned,
    Sheet { sheet: Box<CharacterSheet> },
    Error { kind: &'static str, message: String },
}

impl From<CreationError> for Reply {
    fn from(err: CreationError) -> Self {
        if let CreationError::Persistence(e) = &err {
            tracing::warn!(error = %e, "Creation request failed in storage");
        }
        Reply::Error {
            kind: err.kind().as_str(),
            message: err.user_message(),
        }
    }
}

impl From<CharacterOpError> for Reply {
    fn from(err: CharacterOpError) -> Self {
        let kind = match &err {
            CharacterOpError::NotFound { .. } => "notFound",
            CharacterOpError::Domain(_) => "validation",
            CharacterOpError::Repo(e) => {
                tracing::warn!(error = %e, "Character request failed in storage");
                return Reply::Error {
                    kind: "collaborator",
                    message: "Something went wrong loading your character.".to_string(),
                };
            }
        };
        Reply::Error {
            kind,
            message: err.to_string(),
        }
    }
}

/// Execute one command line against the app.
pub async fn handle_line(app: &App, line: &str) -> Reply {
    let command: Command = match serde_json::from_str(line) {
        Ok(command) => command,
        Err(e) => return CreationError::Malformed(e.to_string()).into(),
    };
    handle(app, command).await
}

pub async fn handle(app: &App, command: Command) -> Reply {
    let registry = &app.use_cases.creation;
    match command {
        Command::Start {
            actor_id,
            scope_id,
            name,
        } => {
            let seed = match CharacterName::new(name) {
                Ok(name) => DraftSeed::new(scope_id, name),
                Err(e) => return CreationError::from(e).into(),
            };
            match registry.start(actor_id, seed).await {
                Ok(view) => Reply::Session { view },
                Err(e) => e.into(),
            }
        }
        Command::Interact(interaction) => match registry.handle(&interaction).await {
            Ok(DispatchOutcome::Updated(view)) => Reply::Session { view },
            Ok(DispatchOutcome::Completed(character)) => Reply::Created {
                character_id: character.id(),
                name: character.name().to_string(),
            },
            Err(e) => e.into(),
        },
        Command::Abandon { actor_id } => match registry.abandon(&actor_id).await {
            Ok(()) => Reply::Abandoned,
            Err(e) => e.into(),
        },
        Command::Sheet { actor_id, scope_id } => {
            match app.use_cases.characters.view(&actor_id, &scope_id).await {
                Ok(sheet) => Reply::Sheet {
                    sheet: Box::new(sheet),
                },
                Err(e) => e.into(),
            }
        }
    }
}

/// Serve commands until `reader` hits end of input.
pub async fn run<R, W>(app: &App, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = handle_line(app, line).await;
        let mut encoded = serde_json::to_vec(&reply).map_err(std::io::Error::other)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}
