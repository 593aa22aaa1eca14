use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, checkbox, container, icon, row, text};
use cosmic::{Element, theme};

use crate::message::Message;
use tasklight::core::item::Item;

/// One to-do card: completion checkbox, title, delete button. Finished items
/// use the dimmer caption style.
pub fn todo_row(item: &Item) -> Element<'static, Message> {
    let toggle_id = item.id.clone();
    let delete_id = item.id.clone();

    let title: Element<'static, Message> = if item.done {
        text::caption(item.title.clone()).width(Length::Fill).into()
    } else {
        text::body(item.title.clone()).width(Length::Fill).into()
    };

    let r = row()
        .spacing(8)
        .align_y(Alignment::Center)
        .push(checkbox("", item.done).on_toggle(move |_| Message::ToggleDone(toggle_id.clone())))
        .push(title)
        .push(
            button::icon(icon::from_name("edit-delete-symbolic"))
                .on_press(Message::Delete(delete_id)),
        );

    container(r)
        .padding([8, 12])
        .width(Length::Fill)
        .class(theme::Container::Card)
        .into()
}
