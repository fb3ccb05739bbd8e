//! Aquarium Tracker entry point
//!
//! On the web this binds the page's form, list and stats panels to the
//! tracker. The native build only reports what a local data directory holds.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement};

    use aquarium_tracker::format::{EMPTY_LIST_MESSAGE, format_liters};
    use aquarium_tracker::persistence::{LocalStorageSlot, MemorySlot, SlotStorage};
    use aquarium_tracker::{Feedback, Field, RecordStore, Tracker};

    type App = Rc<RefCell<Tracker<Box<dyn SlotStorage>>>>;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn input_value(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_input_value(document: &Document, id: &str, value: &str) {
        if let Some(input) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(value);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn escape_html(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Re-render list, stats and form from tracker state
    fn render(app: &App) {
        let Some(document) = document() else {
            return;
        };
        let tracker = app.borrow();

        // Tank list
        if let Some(container) = document.get_element_by_id("fishList") {
            let cards = tracker.cards();
            if cards.is_empty() {
                container.set_inner_html(&format!(
                    "<p class=\"empty-message\" id=\"emptyMessage\">{}</p>",
                    EMPTY_LIST_MESSAGE
                ));
            } else {
                let html: String = cards
                    .iter()
                    .map(|card| {
                        let i = card.index;
                        format!(
                            "<div class=\"fish-card\" data-testid=\"card-fish-{i}\">\
                               <div class=\"fish-card-header\">\
                                 <div class=\"fish-name\" data-testid=\"text-fish-name-{i}\">{name}</div>\
                                 <div class=\"card-actions\">\
                                   <button class=\"edit-btn\" data-action=\"edit\" data-index=\"{i}\" data-testid=\"button-edit-fish-{i}\">Edit</button>\
                                   <button class=\"delete-btn\" data-action=\"delete\" data-index=\"{i}\" data-testid=\"button-delete-fish-{i}\">Delete</button>\
                                 </div>\
                               </div>\
                               <div class=\"fish-detail\" data-testid=\"text-tank-size-{i}\">{size}</div>\
                               <div class=\"fish-detail\" data-testid=\"text-water-change-{i}\">{date}</div>\
                             </div>",
                            name = escape_html(&card.name),
                            size = escape_html(&card.tank_size),
                            date = escape_html(&card.last_water_change),
                        )
                    })
                    .collect();
                container.set_inner_html(&html);
            }
        }

        // Stats
        let stats = tracker.stats();
        set_text(&document, "totalFish", &stats.count.to_string());
        set_text(&document, "avgTankSize", &format_liters(stats.average_tank_size));

        // Form
        let form = tracker.form();
        set_text(&document, "formTitle", form.title);
        set_text(&document, "addFishBtn", form.submit_label);
        if let Some(btn) = document.get_element_by_id("cancelEditBtn") {
            let classes = btn.class_list();
            let _ = if form.cancel_visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
        set_input_value(&document, Field::Name.input_id(), &form.values.name);
        set_input_value(&document, Field::TankSize.input_id(), &form.values.tank_size);
        set_input_value(
            &document,
            Field::LastWaterChange.input_id(),
            &form.values.last_water_change,
        );
    }

    /// Show messages and highlight offending inputs
    fn show_feedback(feedback: &Feedback) {
        let Some(document) = document() else {
            return;
        };

        let invalid = feedback.invalid_fields();
        for field in Field::ALL {
            if let Some(el) = document.get_element_by_id(field.input_id()) {
                let classes = el.class_list();
                let _ = if invalid.contains(&field) {
                    classes.add_1("input-error")
                } else {
                    classes.remove_1("input-error")
                };
            }
        }

        if let Some(el) = document.get_element_by_id("errorMessage") {
            let messages = feedback.messages();
            let html = messages
                .iter()
                .map(|m| escape_html(m))
                .collect::<Vec<_>>()
                .join("<br>");
            el.set_inner_html(&html);
            let _ = if messages.is_empty() {
                el.class_list().remove_1("show")
            } else {
                el.class_list().add_1("show")
            };
        }
    }

    fn handle(app: &App, feedback: Feedback) {
        show_feedback(&feedback);
        // Invalid input stays in the form untouched
        if !matches!(feedback, Feedback::Invalid(_)) {
            render(app);
        }
    }

    fn open_slot() -> Box<dyn SlotStorage> {
        match LocalStorageSlot::open() {
            Ok(slot) => Box::new(slot),
            Err(e) => {
                log::warn!("{e}; changes will not survive a reload");
                Box::new(MemorySlot::new())
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Aquarium Tracker starting...");

        let app: App = Rc::new(RefCell::new(Tracker::new(RecordStore::open(open_slot()))));
        let Some(document) = document() else {
            log::error!("No document available");
            return;
        };

        setup_submit_button(&document, app.clone());
        setup_cancel_button(&document, app.clone());
        setup_list_actions(&document, app.clone());

        render(&app);
        log::info!("Aquarium Tracker ready ({} records)", app.borrow().snapshot().len());
    }

    fn setup_submit_button(document: &Document, app: App) {
        if let Some(btn) = document.get_element_by_id("addFishBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(document) = self::document() else {
                    return;
                };
                let name = input_value(&document, Field::Name.input_id());
                let size = input_value(&document, Field::TankSize.input_id());
                let date = input_value(&document, Field::LastWaterChange.input_id());
                let feedback = app.borrow_mut().submit(&name, &size, &date);
                handle(&app, feedback);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_cancel_button(document: &Document, app: App) {
        if let Some(btn) = document.get_element_by_id("cancelEditBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let feedback = app.borrow_mut().request_cancel_edit();
                handle(&app, feedback);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Edit/Delete buttons are re-rendered often, so one listener on the
    /// list dispatches on `data-action`
    fn setup_list_actions(document: &Document, app: App) {
        if let Some(list) = document.get_element_by_id("fishList") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(button) = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("[data-action]").ok().flatten())
                else {
                    return;
                };
                let Some(index) = button
                    .get_attribute("data-index")
                    .and_then(|i| i.parse::<usize>().ok())
                else {
                    return;
                };

                match button.get_attribute("data-action").as_deref() {
                    Some("edit") => {
                        let feedback = app.borrow_mut().request_edit(index);
                        handle(&app, feedback);
                        if let Some(section) = self::document()
                            .and_then(|d| d.query_selector(".form-section").ok().flatten())
                        {
                            section.scroll_into_view();
                        }
                    }
                    Some("delete") => {
                        let Some(prompt) = app.borrow().delete_prompt(index) else {
                            return;
                        };
                        let confirmed = web_sys::window()
                            .and_then(|w| w.confirm_with_message(&prompt).ok())
                            .unwrap_or(false);
                        if confirmed {
                            let feedback = app.borrow_mut().request_delete(index);
                            handle(&app, feedback);
                        }
                    }
                    _ => {}
                }
            });
            let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use aquarium_tracker::persistence::FileSlot;
    use aquarium_tracker::{RecordStore, format};

    env_logger::init();
    log::info!("Aquarium Tracker (native) starting...");
    log::info!("The tracker UI is web-only - run with `trunk serve` for the web version");

    let store = RecordStore::open(FileSlot::new(".aquarium-tracker"));
    let stats = store.stats();
    println!(
        "{} tanks, average size {}",
        stats.count,
        format::format_liters(stats.average_tank_size)
    );
    for (i, record) in store.list().iter().enumerate() {
        println!(
            "{:>3}. {} - {} - last water change {}",
            i + 1,
            record.name,
            format::format_liters(&record.tank_size),
            format::format_date(&record.last_water_change)
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
