use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, icon, row, scrollable, text, text_input};
use cosmic::Element;

use crate::components::todo_row::todo_row;
use crate::fl;
use crate::message::Message;
use tasklight::store::Snapshot;

pub fn todos_view(
    snapshot: &Snapshot,
    input_value: &str,
    search_value: &str,
    notice: Option<&str>,
) -> Element<'static, Message> {
    let mut content = column().spacing(12);

    if let Some(notice) = notice {
        content = content.push(
            container(
                row()
                    .spacing(8)
                    .align_y(Alignment::Center)
                    .push(text::body(notice.to_string()).width(Length::Fill))
                    .push(
                        button::standard(fl!("notice-dismiss"))
                            .on_press(Message::DismissNotice),
                    ),
            )
            .padding([8, 12])
            .width(Length::Fill),
        );
    }

    let search = text_input::search_input(fl!("search-placeholder"), search_value.to_string())
        .on_input(Message::SearchChanged)
        .width(Length::Fill);
    content = content.push(search);

    let visible = snapshot.visible();
    let mut list = column().spacing(8);
    if visible.is_empty() {
        let empty_msg = if snapshot.is_filtered() {
            fl!("search-empty", query = snapshot.query.clone())
        } else {
            fl!("list-empty")
        };
        list = list.push(
            container(text::body(empty_msg))
                .padding(32)
                .center_x(Length::Fill)
                .width(Length::Fill),
        );
    } else {
        for item in visible {
            list = list.push(todo_row(item));
        }
    }
    content = content.push(scrollable(list).height(Length::Fill));

    // Creation input
    let input = text_input::text_input(fl!("add-placeholder"), input_value.to_string())
        .on_input(Message::InputChanged)
        .on_submit(|_| Message::Submit)
        .width(Length::Fill);

    content = content.push(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(input)
            .push(
                button::icon(icon::from_name("list-add-symbolic"))
                    .on_press(Message::Submit),
            ),
    );

    container(content.padding(16))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
