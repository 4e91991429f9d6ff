use gloo_timers::callback::Timeout;
use yew::prelude::*;

const TOAST_DISMISS_MS: u32 = 4000;

#[derive(Clone, Copy, PartialEq)]
pub enum ToastKind {
    Error,
    Info,
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: String,
    #[prop_or(ToastKind::Error)]
    pub kind: ToastKind,
    pub on_dismiss: Callback<()>,
}

/// Notificación que se cierra sola a los pocos segundos
#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.message.clone(), move |_| {
            let timeout = Timeout::new(TOAST_DISMISS_MS, move || {
                on_dismiss.emit(());
            });
            move || drop(timeout)
        });
    }

    let (icon, class) = match props.kind {
        ToastKind::Error => ("⚠️", "toast toast-error"),
        ToastKind::Info => ("ℹ️", "toast toast-info"),
    };

    let onclick = props.on_dismiss.reform(|_| ());

    html! {
        <div class={class} onclick={onclick}>
            <span class="toast-icon">{icon}</span>
            <span class="toast-message">{&props.message}</span>
        </div>
    }
}
