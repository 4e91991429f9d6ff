use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub title: String,
    pub message: String,
    #[prop_or("Bestätigen".to_string())]
    pub confirm_label: String,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    html! {
        <div class="modal-backdrop">
            <div class="modal modal-confirm">
                <h2>{&props.title}</h2>
                <p>{&props.message}</p>
                <div class="modal-actions">
                    <button class="btn-danger" onclick={props.on_confirm.reform(|_| ())}>
                        {&props.confirm_label}
                    </button>
                    <button class="btn-secondary" onclick={props.on_cancel.reform(|_| ())}>
                        {"Abbrechen"}
                    </button>
                </div>
            </div>
        </div>
    }
}
