//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Every intent for a room, human or scheduled, goes through the actor's
//! channel and is applied one at a time. The actor keeps the last
//! committed `RoomState` and a version counter; a mutation is applied to a
//! copy, saved, and only then becomes the room's state and is broadcast.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parlor_protocol::{ClientMessage, PlayerKey, RoomCode, ServerMessage, Side};
use parlor_rules::{Dice, FollowUp, Phase, Rejection, RoomState, Ruleset, authorize, bot, turn};
use parlor_store::RoomStore;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{HubConfig, HubError, Lifecycle};

/// Message sent to a subscriber's connection.
pub type RoomOutbound = ServerMessage<RoomState>;

/// Channel sender for delivering outbound messages to one connection.
///
/// Broadcasts share one allocation between every subscriber.
pub type PlayerSender = mpsc::UnboundedSender<Arc<RoomOutbound>>;

/// Text sent to a client whose accepted intent could not be persisted.
const SAVE_FAILED: &str = "the game could not be saved, try again";

static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one attached connection within the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Subscribe a connection to the room's broadcasts.
    Attach {
        id: SubscriberId,
        key: PlayerKey,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<()>,
    },

    /// Unsubscribe a connection. Its seat is kept.
    Detach { id: SubscriberId },

    /// A client intent from an attached connection.
    Intent { id: SubscriberId, msg: ClientMessage },

    /// A delayed bot step or auto-pass, derived from state `version`.
    Continue { version: u64, step: FollowUp },

    /// Request a snapshot of the room.
    GetInfo { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of a room: metadata plus the committed game state.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub lifecycle: Lifecycle,
    /// Bumped once per committed mutation.
    pub version: u64,
    /// Connections currently attached.
    pub subscribers: usize,
    pub state: RoomState,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone; the registry hands one to every connection in the room.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn unavailable(&self) -> HubError {
        HubError::Unavailable(self.code.clone())
    }

    /// Subscribes a connection acting as `key`. `name` is used when the
    /// connection joins without naming itself.
    pub async fn attach(
        &self,
        key: PlayerKey,
        name: String,
        sender: PlayerSender,
    ) -> Result<SubscriberId, HubError> {
        let id = SubscriberId::next();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Attach {
                id,
                key,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?;
        Ok(id)
    }

    /// Unsubscribes a connection (fire-and-forget).
    pub async fn detach(&self, id: SubscriberId) -> Result<(), HubError> {
        self.sender
            .send(RoomCommand::Detach { id })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Queues a client intent. The outcome arrives on the subscriber's
    /// channel: a private `error`, or a `game_start` and/or broadcast.
    pub async fn submit(&self, id: SubscriberId, msg: ClientMessage) -> Result<(), HubError> {
        self.sender
            .send(RoomCommand::Intent { id, msg })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Requests the current room info. Every command queued before this
    /// one has been applied by the time it answers.
    pub async fn get_info(&self) -> Result<RoomInfo, HubError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }
}

struct Subscriber {
    key: PlayerKey,
    name: String,
    sender: PlayerSender,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<S: RoomStore> {
    code: RoomCode,
    rules: &'static dyn Ruleset,
    state: RoomState,
    version: u64,
    config: HubConfig,
    store: Arc<S>,
    dice: Arc<dyn Dice>,
    subscribers: HashMap<SubscriberId, Subscriber>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Lets scheduled continuations reach the actor without keeping it
    /// alive once every handle is gone.
    mailbox: mpsc::WeakSender<RoomCommand>,
}

impl<S: RoomStore> RoomActor<S> {
    /// Runs the actor loop until every handle has been dropped.
    async fn run(mut self) {
        info!(room = %self.code, game = %self.state.game_type(), "room actor started");

        // A state loaded mid bot turn must keep moving.
        self.schedule_follow_up();

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Attach {
                    id,
                    key,
                    name,
                    sender,
                    reply,
                } => {
                    debug!(room = %self.code, %id, %key, "subscriber attached");
                    self.subscribers.insert(id, Subscriber { key, name, sender });
                    let _ = reply.send(());
                }
                RoomCommand::Detach { id } => {
                    if let Some(sub) = self.subscribers.remove(&id) {
                        debug!(room = %self.code, %id, key = %sub.key, "subscriber detached");
                    }
                }
                RoomCommand::Intent { id, msg } => self.handle_intent(id, msg).await,
                RoomCommand::Continue { version, step } => {
                    self.handle_continue(version, step).await;
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        info!(room = %self.code, "room actor stopped");
    }

    async fn handle_intent(&mut self, id: SubscriberId, msg: ClientMessage) {
        let Some(sub) = self.subscribers.get(&id) else {
            warn!(room = %self.code, %id, "intent from unknown subscriber, ignoring");
            return;
        };
        let key = sub.key.clone();

        let mut next = self.state.clone();
        let outcome: Result<Option<Side>, Rejection> = match msg {
            ClientMessage::JoinGame { name } => {
                let name = name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| sub.name.clone());
                let present = self.present_keys();
                let side = self.rules.assign_seat(&mut next, &key, &name, &present);
                info!(room = %self.code, %key, %side, "player joined");
                Ok(Some(side))
            }
            ClientMessage::MakeMove { index, player } => authorize(&next, &key, player)
                .and_then(|()| self.rules.apply_move(&mut next, index, player))
                .map(|()| None),
            ClientMessage::RollDice { player } => authorize(&next, &key, player)
                .and_then(|()| self.rules.roll_dice(&mut next, player, self.dice.as_ref()))
                .map(|_| None),
            ClientMessage::ResetGame => {
                self.rules.reset_game(&mut next);
                info!(room = %self.code, %key, "game reset");
                Ok(None)
            }
        };

        match outcome {
            Err(rejection) => {
                debug!(room = %self.code, %key, %rejection, "intent rejected");
                self.send_to(id, ServerMessage::Error { message: rejection.to_string() });
            }
            Ok(joined) => {
                if !self.commit(next).await {
                    self.send_to(id, ServerMessage::Error { message: SAVE_FAILED.to_owned() });
                    return;
                }
                if let Some(side) = joined {
                    self.send_to(
                        id,
                        ServerMessage::GameStart { side, game_state: self.state.clone() },
                    );
                }
                self.broadcast();
                self.schedule_follow_up();
            }
        }
    }

    /// Runs a scheduled step if the state it was derived from is still the
    /// room's state. Anything committed in between wins.
    async fn handle_continue(&mut self, version: u64, step: FollowUp) {
        if version != self.version {
            debug!(room = %self.code, ?step, version, current = self.version, "stale continuation");
            return;
        }

        let mut next = self.state.clone();
        let outcome = match step {
            FollowUp::BotRoll(side) => bot::bot_roll(&mut next, side, self.dice.as_ref()).map(drop),
            FollowUp::BotMove(side) => bot::bot_move(&mut next, side).map(drop),
            FollowUp::AutoPass => {
                if !next.game_over && next.phase() == Some(Phase::AutoPass) {
                    turn::pass_turn(&mut next);
                    Ok(())
                } else {
                    Err(Rejection::NotYourTurn)
                }
            }
        };

        if let Err(rejection) = outcome {
            debug!(room = %self.code, ?step, %rejection, "continuation no longer applies");
            return;
        }

        if self.commit(next).await {
            self.broadcast();
            self.schedule_follow_up();
        } else {
            // Nothing changed, so the same step is still owed.
            self.schedule(step);
        }
    }

    /// Saves `next` and makes it the room's state. Returns `false`, leaving
    /// the state untouched, if the store refused it.
    async fn commit(&mut self, next: RoomState) -> bool {
        if let Err(e) = self.store.save(&self.code, &next).await {
            warn!(room = %self.code, error = %e, "save failed, discarding change");
            return false;
        }

        let finished = next.game_over && !self.state.game_over;
        self.state = next;
        self.version += 1;

        if finished {
            info!(
                room = %self.code,
                winner = ?self.state.winner,
                "game finished"
            );
        }
        true
    }

    fn schedule_follow_up(&self) {
        if let Some(step) = turn::follow_up(&self.state) {
            self.schedule(step);
        }
    }

    /// Sends `step` back to this actor after its delay, tagged with the
    /// current version.
    fn schedule(&self, step: FollowUp) {
        let delay = match step {
            FollowUp::BotRoll(_) => self.config.bot_think_delay,
            FollowUp::BotMove(_) => self.config.bot_move_delay,
            FollowUp::AutoPass => self.config.auto_pass_delay,
        };
        let version = self.version;
        let mailbox = self.mailbox.clone();
        debug!(room = %self.code, ?step, version, ?delay, "scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx.send(RoomCommand::Continue { version, step }).await;
            }
        });
    }

    /// Sends the committed state to every subscriber, pruning the ones
    /// whose connection is gone.
    fn broadcast(&mut self) {
        let msg = Arc::new(ServerMessage::GameUpdate { game_state: self.state.clone() });
        let code = &self.code;
        self.subscribers.retain(|id, sub| {
            let alive = sub.sender.send(Arc::clone(&msg)).is_ok();
            if !alive {
                debug!(room = %code, %id, "pruning closed subscriber");
            }
            alive
        });
    }

    /// Sends a message to one subscriber. Silently drops if the receiver
    /// is gone.
    fn send_to(&self, id: SubscriberId, msg: RoomOutbound) {
        if let Some(sub) = self.subscribers.get(&id) {
            let _ = sub.sender.send(Arc::new(msg));
        }
    }

    fn present_keys(&self) -> HashSet<PlayerKey> {
        self.subscribers.values().map(|s| s.key.clone()).collect()
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            lifecycle: Lifecycle::of(&self.state),
            version: self.version,
            subscribers: self.subscribers.len(),
            state: self.state.clone(),
        }
    }
}

/// Spawns a room actor over an already-loaded state and returns a handle
/// to it.
///
/// `config.channel_size` controls backpressure: if the channel fills up,
/// senders wait (bounded channel).
pub(crate) fn spawn_room<S: RoomStore>(
    code: RoomCode,
    state: RoomState,
    store: Arc<S>,
    dice: Arc<dyn Dice>,
    config: HubConfig,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size);

    let actor = RoomActor {
        code: code.clone(),
        rules: parlor_rules::ruleset(state.game_type()),
        state,
        version: 0,
        config,
        store,
        dice,
        subscribers: HashMap::new(),
        receiver: rx,
        mailbox: tx.downgrade(),
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
