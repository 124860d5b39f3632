use iced::widget::{column, container, image, row, text};
use iced::{event, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use std::path::PathBuf;

// Declare the application modules
mod bridge;
mod convert;
mod dropzone;
mod state;

use dropzone::DroppedItem;
use state::ui::{Phase, Ui, UiEvent};

/// Main application state
struct PortraitDrop {
    /// Visible state machine: phase plus status line
    ui: Ui,
    /// Handle to the conversion worker, once it has started
    bridge: Option<bridge::Connection>,
    /// Files hovered over the window during the current drag gesture
    hovered: Vec<PathBuf>,
    /// Whether the current gesture's drop has already been handled
    drop_handled: bool,
    /// Preview of the dropped image
    input: Option<image::Handle>,
    /// Converted portrait returned by the worker
    output: Option<image::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A dragged file entered the window
    FileHovered(PathBuf),
    /// The dragged payload left the window without dropping
    HoverLeft,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// The dropped file was read into memory (or failed to)
    FileLoaded(Result<Vec<u8>, String>),
    /// An event from the conversion worker
    Bridge(bridge::Event),
}

impl PortraitDrop {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        println!("🖼  Portrait Drop initialized");

        (
            PortraitDrop {
                ui: Ui::new(),
                bridge: None,
                hovered: Vec::new(),
                drop_handled: false,
                input: None,
                output: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FileHovered(path) => {
                // A hover after a handled drop starts a new gesture
                if self.drop_handled {
                    self.hovered.clear();
                    self.drop_handled = false;
                }
                self.hovered.push(path);
                Task::none()
            }
            Message::HoverLeft => {
                self.hovered.clear();
                self.drop_handled = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                if self.drop_handled {
                    // Remaining files of a gesture we already processed
                    return Task::none();
                }
                self.drop_handled = true;

                // The hovered paths are the candidate list for this gesture.
                // Some platforms drop without hovering first; then the dropped
                // path is the whole gesture.
                let mut paths = std::mem::take(&mut self.hovered);
                if !paths.contains(&path) {
                    paths.push(path);
                }

                let items: Vec<DroppedItem> =
                    paths.into_iter().map(DroppedItem::from_path).collect();
                self.process_drop(items)
            }
            Message::FileLoaded(Ok(bytes)) => {
                if self.ui.phase == Phase::Processing {
                    eprintln!("⏳ Conversion already running, ignoring drop");
                    return Task::none();
                }

                self.input = Some(image::Handle::from_bytes(bytes.clone()));
                self.output = None;
                self.ui = self.ui.apply(UiEvent::ConversionStarted);

                if let Some(bridge) = &mut self.bridge {
                    bridge.send(bytes);
                }

                Task::none()
            }
            Message::FileLoaded(Err(detail)) => {
                eprintln!("❌ {}", detail);
                self.ui = self.ui.apply(UiEvent::ReadFailed(detail));
                Task::none()
            }
            Message::Bridge(bridge::Event::Ready(connection)) => {
                println!("🧠 Portrait converter ready");
                self.bridge = Some(connection);
                Task::none()
            }
            Message::Bridge(bridge::Event::Finished(reply)) => {
                // A reply is only meaningful while a conversion is running
                if self.ui.phase != Phase::Processing {
                    eprintln!("🚫 Discarding converter reply: no conversion in flight");
                    return Task::none();
                }

                match reply {
                    bridge::Reply::Result(bytes) => {
                        // The converter always emits PNG
                        self.output = Some(image::Handle::from_bytes(bytes));
                        self.ui = self.ui.apply(UiEvent::ConversionDone);
                    }
                    bridge::Reply::Error(detail) => {
                        eprintln!("❌ Conversion failed: {}", detail);
                        self.ui = self.ui.apply(UiEvent::ConversionFailed(detail));
                    }
                }

                Task::none()
            }
        }
    }

    /// Validate one completed drop gesture and start reading the selected file
    fn process_drop(&mut self, items: Vec<DroppedItem>) -> Task<Message> {
        if self.ui.phase == Phase::Processing {
            eprintln!("⏳ Conversion already running, ignoring drop");
            return Task::none();
        }

        let Some(item) = dropzone::select(&items) else {
            self.ui = self.ui.apply(UiEvent::NothingDropped);
            return Task::none();
        };

        if self.bridge.is_none() {
            eprintln!("🚫 Converter is still starting, ignoring drop");
            return Task::none();
        }

        Task::perform(dropzone::read(item.path.clone()), Message::FileLoaded)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let input_slot: Element<Message> = match &self.input {
            Some(handle) => image(handle.clone()).height(Length::Fill).into(),
            None => text("Drop a JPEG or PNG anywhere in this window")
                .size(16)
                .into(),
        };

        let output_slot: Element<Message> = match &self.output {
            Some(handle) => image(handle.clone()).height(Length::Fill).into(),
            None => text("").into(),
        };

        let content = column![
            text("Portrait Drop").size(48),
            row![input_slot, output_slot]
                .spacing(20)
                .height(Length::Fill),
            text(&self.ui.status).size(16),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Listen for file drag events and run the conversion worker
    fn subscription(&self) -> Subscription<Message> {
        let drops = event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(path)) => Some(Message::FileHovered(path)),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::HoverLeft),
            _ => None,
        });

        Subscription::batch([drops, Subscription::run(bridge::start).map(Message::Bridge)])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Portrait Drop",
        PortraitDrop::update,
        PortraitDrop::view,
    )
    .subscription(PortraitDrop::subscription)
    .theme(PortraitDrop::theme)
    .centered()
    .run_with(PortraitDrop::new)
}
