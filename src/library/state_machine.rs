use std::marker::PhantomData;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

/// Elm-style loop: a pure `transition` owns the state, effects run on their
/// own threads and report back as events over one channel, so the state is
/// only ever touched by the thread calling [`StateMachine::run`].
pub struct StateMachine<TState, TEvent, TEffect, T, R, E>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync,
    R: Fn(&TState) + Send + Sync,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync,
{
    pub transition_fn: Arc<T>,
    pub render_fn: Arc<R>,
    pub run_effect_fn: Arc<E>,
    _marker: PhantomData<fn(TState, TEvent, TEffect)>,
}

impl<TState, TEvent, TEffect, T, R, E> StateMachine<TState, TEvent, TEffect, T, R, E>
where
    TState: 'static,
    TEvent: Send + 'static,
    TEffect: Send + 'static,
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync + 'static,
    R: Fn(&TState) + Send + Sync + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
{
    pub fn new(transition_fn: T, render_fn: R, run_effect_fn: E) -> Self {
        Self {
            transition_fn: Arc::new(transition_fn),
            render_fn: Arc::new(render_fn),
            run_effect_fn: Arc::new(run_effect_fn),
            _marker: PhantomData,
        }
    }

    /// Processes events in arrival order. Callers may keep clones of
    /// `event_sender` to inject events from outside.
    pub fn run(
        &self,
        init: (TState, Vec<TEffect>),
        event_sender: Sender<TEvent>,
        event_receiver: Receiver<TEvent>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (mut state, effects) = init;
        (self.render_fn)(&state);
        self.spawn_effects(effects, &event_sender);

        loop {
            let event = event_receiver.recv()?;
            let (new_state, new_effects) = (self.transition_fn)(state, event);
            state = new_state;
            (self.render_fn)(&state);
            self.spawn_effects(new_effects, &event_sender);
        }
    }

    fn spawn_effects(&self, effects: Vec<TEffect>, event_sender: &Sender<TEvent>) {
        for effect in effects {
            let effect_sender = event_sender.clone();
            let run_effect_fn = Arc::clone(&self.run_effect_fn);
            std::thread::spawn(move || {
                run_effect_fn(effect, effect_sender);
            });
        }
    }
}
