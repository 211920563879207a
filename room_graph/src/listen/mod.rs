//! Change notification channels.
//!
//! A publisher owns a [`Notifier`] and delivers messages to its [`Listener`]s synchronously,
//! in subscription order. A listener usually holds a weak reference to its recipient's
//! state and reports itself dead once that state is dropped, after which the notifier
//! discards it. Listeners can also be removed explicitly with [`Notifier::unlisten`].
//!
//! Listeners run while the publisher is mid-update, so they should only record what they
//! were told (see [`Sink`] and [`DirtyFlag`]) and leave the reaction to their owner.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Receiver of messages from a [`Notifier`].
pub trait Listener<M> {
    /// Deliver a message. Returns `false` once the listener is no longer interested.
    fn receive(&self, message: &M) -> bool;

    /// Whether the listener still wants messages.
    fn alive(&self) -> bool {
        true
    }
}

/// Handle returned by [`Notifier::listen`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<M> {
    id: ListenerId,
    listener: Box<dyn Listener<M>>,
}

/// Ordered set of listeners owned by a publisher.
pub struct Notifier<M> {
    listeners: RefCell<Vec<Entry<M>>>,
    next_id: Cell<u64>,
}

impl<M> Notifier<M> {
    /// Constructs a new empty [`Notifier`].
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Subscribe `listener`. It will be notified after every listener added before it.
    pub fn listen<L: Listener<M> + 'static>(&self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Entry {
            id,
            listener: Box::new(listener),
        });
        id
    }

    /// Remove a listener. Returns whether it was still subscribed.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    /// Deliver a message to all listeners, dropping those that report themselves dead.
    pub fn notify(&self, message: &M) {
        self.listeners
            .borrow_mut()
            .retain(|entry| entry.listener.alive() && entry.listener.receive(message));
    }

    /// Number of live listeners.
    pub fn count(&self) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|entry| entry.listener.alive());
        listeners.len()
    }
}

impl<M> Default for Notifier<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for Notifier<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.listeners.try_borrow() {
            Ok(listeners) => f.debug_tuple("Notifier").field(&listeners.len()).finish(),
            Err(_) => f.debug_tuple("Notifier").field(&"?").finish(),
        }
    }
}

/// Collects every message it receives, for inspection by its owner.
#[derive(Debug)]
pub struct Sink<M> {
    messages: Rc<RefCell<Vec<M>>>,
}

impl<M: Clone + 'static> Sink<M> {
    pub fn new() -> Self {
        Self {
            messages: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A listener feeding this sink. It dies when the sink is dropped.
    pub fn listener(&self) -> SinkListener<M> {
        SinkListener(Rc::downgrade(&self.messages))
    }

    /// Remove and return all messages received so far.
    pub fn drain(&self) -> Vec<M> {
        self.messages.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl<M: Clone + 'static> Default for Sink<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Listener`] half of a [`Sink`].
pub struct SinkListener<M>(Weak<RefCell<Vec<M>>>);

impl<M: Clone> Listener<M> for SinkListener<M> {
    fn receive(&self, message: &M) -> bool {
        match self.0.upgrade() {
            Some(messages) => {
                messages.borrow_mut().push(message.clone());
                true
            }
            None => false,
        }
    }

    fn alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Remembers whether any message arrived since it was last cleared.
#[derive(Debug)]
pub struct DirtyFlag {
    flag: Rc<Cell<bool>>,
}

impl DirtyFlag {
    /// Create a flag in the given initial state.
    pub fn new(dirty: bool) -> Self {
        Self {
            flag: Rc::new(Cell::new(dirty)),
        }
    }

    pub fn listener(&self) -> DirtyFlagListener {
        DirtyFlagListener(Rc::downgrade(&self.flag))
    }

    pub fn is_dirty(&self) -> bool {
        self.flag.get()
    }

    pub fn set(&self) {
        self.flag.set(true);
    }

    /// Return whether the flag was set, clearing it.
    pub fn take(&self) -> bool {
        self.flag.replace(false)
    }
}

/// [`Listener`] half of a [`DirtyFlag`]; accepts any message type.
pub struct DirtyFlagListener(Weak<Cell<bool>>);

impl<M> Listener<M> for DirtyFlagListener {
    fn receive(&self, _message: &M) -> bool {
        match self.0.upgrade() {
            Some(flag) => {
                flag.set(true);
                true
            }
            None => false,
        }
    }

    fn alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
