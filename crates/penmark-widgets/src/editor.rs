//! Editor shell: owns the editing state and routes input events through the
//! widget handlers in their fixed priority order.

use crate::controller::{EditingContext, WidgetController};
use crate::insertion;
use crate::toolbar::{ContextualBalloon, WidgetToolbarRepository};
use penmark_core::events::{DeleteEvent, EventInfo, KeyDownEvent, PointerDownEvent, Priority};
use penmark_core::model::{ModelDocument, NodeId, Schema, Writer};
use penmark_core::view::{HostProfile, Mapper, ViewDocument, ViewWriter, render_selection};

/// An entry in a per-event dispatch table.
pub type EventHandler<E> =
    fn(&mut WidgetController, &E, &mut EventInfo, &mut EditingContext<'_>);

/// The assembled editing stack: model, view, mapper and the widget
/// subsystem, with the event plumbing a host integration would provide.
/// Handlers are kept in per-event tables and run tier by tier.
pub struct Editor {
    model: ModelDocument,
    schema: Schema,
    view: ViewDocument,
    mapper: Mapper,
    controller: WidgetController,
    toolbars: WidgetToolbarRepository,
    key_handlers: Vec<(Priority, EventHandler<KeyDownEvent>)>,
    pointer_handlers: Vec<(Priority, EventHandler<PointerDownEvent>)>,
    delete_handlers: Vec<(Priority, EventHandler<DeleteEvent>)>,
}

impl Editor {
    pub fn new(schema: Schema, host: HostProfile) -> Self {
        Self {
            model: ModelDocument::new(),
            schema,
            view: ViewDocument::new(host),
            mapper: Mapper::new(),
            controller: WidgetController::new(),
            toolbars: WidgetToolbarRepository::new(),
            key_handlers: vec![(Priority::High, WidgetController::on_key_down as _)],
            pointer_handlers: vec![(Priority::High, WidgetController::on_pointer_down as _)],
            delete_handlers: vec![(Priority::High, WidgetController::on_delete as _)],
        }
    }

    pub fn model(&self) -> &ModelDocument {
        &self.model
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn view(&self) -> &ViewDocument {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewDocument {
        &mut self.view
    }

    pub fn view_writer(&mut self) -> ViewWriter<'_> {
        self.view.writer()
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut Mapper {
        &mut self.mapper
    }

    pub fn toolbars(&mut self) -> &mut WidgetToolbarRepository {
        &mut self.toolbars
    }

    /// Run a model change block, then re-render the selection.
    pub fn change<R>(&mut self, f: impl FnOnce(&mut Writer) -> R) -> R {
        let result = self.model.change(f);
        self.commit_and_render();
        result
    }

    /// Insert an atomic element at the optimal position and select it.
    pub fn insert_object(&mut self, name: &str) -> NodeId {
        let element = insertion::insert_object(&mut self.model, &self.schema, name);
        self.commit_and_render();
        element
    }

    /// Register an additional key handler at the given tier.
    pub fn add_key_handler(&mut self, priority: Priority, handler: EventHandler<KeyDownEvent>) {
        self.key_handlers.push((priority, handler));
    }

    /// Register an additional pointer handler at the given tier.
    pub fn add_pointer_handler(
        &mut self,
        priority: Priority,
        handler: EventHandler<PointerDownEvent>,
    ) {
        self.pointer_handlers.push((priority, handler));
    }

    /// Register an additional delete handler at the given tier.
    pub fn add_delete_handler(&mut self, priority: Priority, handler: EventHandler<DeleteEvent>) {
        self.delete_handlers.push((priority, handler));
    }

    /// Dispatch a key press. Returns the event state after all handlers ran.
    pub fn fire_key_down(&mut self, event: KeyDownEvent) -> EventInfo {
        let handlers = self.key_handlers.clone();
        self.dispatch(handlers, &event)
    }

    /// Dispatch a pointer press on a view node.
    pub fn fire_pointer_down(&mut self, event: PointerDownEvent) -> EventInfo {
        let handlers = self.pointer_handlers.clone();
        self.dispatch(handlers, &event)
    }

    /// Dispatch a delete request.
    pub fn fire_delete(&mut self, event: DeleteEvent) -> EventInfo {
        let handlers = self.delete_handlers.clone();
        self.dispatch(handlers, &event)
    }

    /// Run a handler table tier by tier, high to low, then re-render. A
    /// stopped event does not reach lower tiers; within a tier the stable
    /// sort keeps registration order.
    fn dispatch<E>(
        &mut self,
        mut handlers: Vec<(Priority, EventHandler<E>)>,
        event: &E,
    ) -> EventInfo {
        handlers.sort_by_key(|&(priority, _)| priority);
        let mut info = EventInfo::new();
        for (_, handler) in handlers {
            if info.is_stopped() {
                break;
            }
            handler(
                &mut self.controller,
                event,
                &mut info,
                &mut EditingContext {
                    model: &mut self.model,
                    schema: &self.schema,
                    view: &mut self.view,
                    mapper: &self.mapper,
                },
            );
        }
        self.commit_and_render();
        info
    }

    /// Selection-conversion pass: default rendering first, then the widget
    /// post-processing which runs at low priority so it observes the final
    /// view selection.
    pub fn commit_and_render(&mut self) {
        render_selection(&self.model, &self.mapper, &mut self.view);
        self.controller.on_selection_rendered(&mut EditingContext {
            model: &mut self.model,
            schema: &self.schema,
            view: &mut self.view,
            mapper: &self.mapper,
        });
    }

    /// UI refresh tick: arbitrate widget toolbar visibility.
    pub fn ui_update(&mut self, balloon: &mut dyn ContextualBalloon) {
        self.toolbars.update(&self.view, balloon);
    }
}
