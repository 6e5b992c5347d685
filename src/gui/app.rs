use crate::config::{self, Config, DialConfig};
use crate::dial::{DialGeometry, DialHandle, DragTracker, Point, Size, SubscriptionId, Value};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, DialStyle};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub state: DialHandle,
    pub config: DialConfig,
    pub style: Rc<RefCell<DialStyle>>,
    pub label: String,
    pub drawing_area: gtk::DrawingArea,
    drag: DragTracker,
    subscription: SubscriptionId,
}

#[derive(Debug)]
pub enum AppMsg {
    DragBegin(Point),
    DragUpdate(f64, f64),
    DragEnd,
    SetValue(f64),
    ValueChanged(Value),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::SetValue(v) => AppMsg::SetValue(v),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn geometry(&self) -> DialGeometry {
        let size = Size::new(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
        );
        DialGeometry::from_size(size, self.config.inset)
    }

    fn drag_to(&self, point: Point) {
        let value = self.geometry().value_at(point);
        self.state.borrow_mut().set(value.get());
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (DialHandle, Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Dial"),
            set_resizable: true,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_content_width: model.config.size,
                    set_content_height: model.config.size,
                    set_hexpand: true,
                    set_vexpand: true,

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, x, y| {
                            sender.input(AppMsg::DragBegin(Point::new(x, y)));
                        },
                        connect_drag_update[sender] => move |_, dx, dy| {
                            sender.input(AppMsg::DragUpdate(dx, dy));
                        },
                        connect_drag_end[sender] => move |_, _, _| {
                            sender.input(AppMsg::DragEnd);
                        },
                    }
                },

                gtk::Label {
                    add_css_class: "dial-value",
                    #[watch]
                    set_label: &model.label,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, config, rx) = init;

        theme::load_css();

        // Redraws are driven by the state's change notifications, not by
        // whoever happened to call `set`.
        let value_sender = sender.clone();
        let subscription = state
            .borrow_mut()
            .subscribe(move |value| value_sender.input(AppMsg::ValueChanged(value)));

        let label = view::label_text(state.borrow().get());
        let model = AppModel {
            state,
            style: Rc::new(RefCell::new(DialStyle::from_config(&config.dial))),
            config: config.dial,
            label,
            drawing_area: gtk::DrawingArea::default(),
            drag: DragTracker::new(),
            subscription,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        let style_draw = model.style.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style = style_draw.borrow();
                let geometry =
                    DialGeometry::from_size(Size::new(width as f64, height as f64), style.inset);
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let value = state_draw.borrow().get();
                if let Err(e) = view::draw(cr, &geometry, value, &style, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::DragBegin(start) => {
                let knob = self.geometry().knob_position(self.state.borrow().get());
                if self.drag.begin(start, knob, self.config.hit_radius()) {
                    self.drag_to(start);
                }
            }
            AppMsg::DragUpdate(dx, dy) => {
                if let Some(point) = self.drag.update(dx, dy) {
                    self.drag_to(point);
                }
            }
            AppMsg::DragEnd => self.drag.end(),
            AppMsg::SetValue(v) => {
                self.state.borrow_mut().set(v);
            }
            AppMsg::ValueChanged(value) => {
                self.label = view::label_text(value);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.config = new_config.dial;
                    *self.style.borrow_mut() = DialStyle::from_config(&self.config);
                    self.drawing_area.set_content_width(self.config.size);
                    self.drawing_area.set_content_height(self.config.size);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.state.borrow_mut().unsubscribe(self.subscription);
    }
}
